//! Configuration for the qblast client, read from a config file and environment variables.
//!

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args as ClapArgs;
use serde::{Deserialize, Serialize};
use tracing::subscriber::set_global_default;
use tracing_subscriber::fmt::{format, layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::FormattingStyle::{Compact, Full, Json, Pretty};
use crate::error::Error::{ParseError, TracingError};
use crate::error::Result;
use crate::http::client::HttpClientConfig;
use crate::http::{ValidatedUrl, default_base_url};

pub mod parser;

/// Represents a usage string for qblast-rs.
pub const USAGE: &str = "To configure qblast-rs use a config file or environment variables. \
See the documentation of the qblast-config crate for more information.";

fn default_poll_interval() -> u64 {
  5
}

fn default_results_file_path() -> &'static str {
  "response.zip"
}

/// The command line arguments used to locate the config.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Args {
  #[arg(
    short,
    long,
    global = true,
    env = "QBLAST_CONFIG",
    help = "Set the location of the config file"
  )]
  config: Option<PathBuf>,
  #[arg(short, long, help = "Print a default config file")]
  print_default_config: bool,
}

impl Args {
  /// Create new args.
  pub fn new(config: Option<PathBuf>, print_default_config: bool) -> Self {
    Self {
      config,
      print_default_config,
    }
  }

  /// Returns the config, or prints the default config and returns `None`.
  pub fn load(&self) -> Result<Option<Config>> {
    if self.print_default_config {
      println!("{}", Config::default_toml()?);
      Ok(None)
    } else {
      Config::from_path(&self.config.clone().unwrap_or_default()).map(Some)
    }
  }
}

/// Determines which tracing formatting style to use.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum FormattingStyle {
  #[default]
  Full,
  Compact,
  Pretty,
  Json,
}

/// Configuration for the qblast client.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  formatting_style: FormattingStyle,
  base_url: ValidatedUrl,
  poll_interval: u64,
  results_file_path: PathBuf,
  http_client: HttpClientConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      formatting_style: Full,
      base_url: default_base_url(),
      poll_interval: default_poll_interval(),
      results_file_path: default_results_file_path().into(),
      http_client: Default::default(),
    }
  }
}

impl Config {
  /// Create a new config.
  pub fn new(
    formatting_style: FormattingStyle,
    base_url: ValidatedUrl,
    poll_interval: u64,
    results_file_path: PathBuf,
    http_client: HttpClientConfig,
  ) -> Self {
    Self {
      formatting_style,
      base_url,
      poll_interval,
      results_file_path,
      http_client,
    }
  }

  /// Read a config struct from a TOML file, merged with environment variables.
  pub fn from_path(path: &Path) -> Result<Self> {
    parser::from_path::<Self>(path)?.validate()
  }

  /// Read a config struct from a TOML string, merged with environment variables.
  pub fn from_toml_str(str: &str) -> Result<Self> {
    parser::from_str::<Self>(str)?.validate()
  }

  /// Render the default config as TOML.
  pub fn default_toml() -> Result<String> {
    toml::ser::to_string_pretty(&Config::default()).map_err(|err| ParseError(err.to_string()))
  }

  fn validate(self) -> Result<Self> {
    if self.poll_interval == 0 {
      return Err(ParseError(
        "poll_interval must be greater than zero".to_string(),
      ));
    }

    Ok(self)
  }

  /// Setup tracing, using a global subscriber.
  pub fn setup_tracing(&self) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = Registry::default().with(env_filter);

    match self.formatting_style() {
      Full => set_global_default(subscriber.with(layer())),
      Compact => set_global_default(subscriber.with(layer().event_format(format().compact()))),
      Pretty => set_global_default(subscriber.with(layer().event_format(format().pretty()))),
      Json => set_global_default(subscriber.with(layer().event_format(format().json()))),
    }
    .map_err(|err| TracingError(err.to_string()))?;

    Ok(())
  }

  /// Get the formatting style.
  pub fn formatting_style(&self) -> FormattingStyle {
    self.formatting_style
  }

  /// Get the base url of the service.
  pub fn base_url(&self) -> &ValidatedUrl {
    &self.base_url
  }

  /// Get the interval between status checks.
  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(self.poll_interval)
  }

  /// Get the default path that bulk results are written to.
  pub fn results_file_path(&self) -> &Path {
    &self.results_file_path
  }

  /// Get the http client config.
  pub fn http_client(&self) -> &HttpClientConfig {
    &self.http_client
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use std::fmt::Display;

  use figment::Jail;

  use crate::http::DEFAULT_BASE_URL;

  use super::*;

  fn test_config<K, V, F>(contents: Option<&str>, env_variables: Vec<(K, V)>, test_fn: F)
  where
    K: AsRef<str>,
    V: Display,
    F: FnOnce(Config),
  {
    Jail::expect_with(|jail| {
      if let Some(contents) = contents {
        jail.create_file("test.toml", contents)?;
      }

      for (key, value) in env_variables {
        jail.set_env(key, value);
      }

      test_fn(Config::from_path(Path::new("test.toml")).map_err(|err| err.to_string())?);

      Ok(())
    });
  }

  pub(crate) fn test_config_from_env<K, V, F>(env_variables: Vec<(K, V)>, test_fn: F)
  where
    K: AsRef<str>,
    V: Display,
    F: FnOnce(Config),
  {
    test_config(None, env_variables, test_fn);
  }

  pub(crate) fn test_config_from_file<F>(contents: &str, test_fn: F)
  where
    F: FnOnce(Config),
  {
    test_config(Some(contents), Vec::<(&str, &str)>::new(), test_fn);
  }

  #[test]
  fn config_defaults() {
    test_config_from_env(Vec::<(&str, &str)>::new(), |config| {
      assert_eq!(config.base_url().to_string(), DEFAULT_BASE_URL);
      assert_eq!(config.poll_interval(), Duration::from_secs(5));
      assert_eq!(config.results_file_path(), Path::new("response.zip"));
      assert_eq!(config.formatting_style(), Full);
      assert_eq!(config.http_client(), &HttpClientConfig::default());
    });
  }

  #[test]
  fn config_base_url_env() {
    test_config_from_env(
      vec![("QBLAST_BASE_URL", "http://127.0.0.1:8080/Blast.cgi")],
      |config| {
        assert_eq!(
          config.base_url().to_string(),
          "http://127.0.0.1:8080/Blast.cgi"
        );
      },
    );
  }

  #[test]
  fn config_poll_interval_env() {
    test_config_from_env(vec![("QBLAST_POLL_INTERVAL", 60)], |config| {
      assert_eq!(config.poll_interval(), Duration::from_secs(60));
    });
  }

  #[test]
  fn config_http_client_user_agent_env() {
    test_config_from_env(
      vec![("QBLAST_HTTP_CLIENT_USER_AGENT", "qblast-rs")],
      |config| {
        assert_eq!(config.http_client().user_agent(), Some("qblast-rs"));
      },
    );
  }

  #[test]
  fn config_base_url_file() {
    test_config_from_file(
      r#"base_url = "https://example.com/Blast.cgi""#,
      |config| {
        assert_eq!(config.base_url().to_string(), "https://example.com/Blast.cgi");
      },
    );
  }

  #[test]
  fn config_results_file_path_file() {
    test_config_from_file(r#"results_file_path = "results.zip""#, |config| {
      assert_eq!(config.results_file_path(), Path::new("results.zip"));
    });
  }

  #[test]
  fn config_formatting_style_file() {
    test_config_from_file(r#"formatting_style = "Json""#, |config| {
      assert_eq!(config.formatting_style(), Json);
    });
  }

  #[test]
  fn config_http_client_file() {
    test_config_from_file(
      r#"
      [http_client]
      user_agent = "qblast-rs"
      timeout = 30
      "#,
      |config| {
        assert_eq!(config.http_client().user_agent(), Some("qblast-rs"));
        assert_eq!(
          config.http_client().timeout(),
          Some(Duration::from_secs(30))
        );
      },
    );
  }

  #[test]
  #[should_panic]
  fn config_invalid_base_url_scheme() {
    test_config_from_file(r#"base_url = "ftp://example.com/Blast.cgi""#, |_| {});
  }

  #[test]
  #[should_panic]
  fn config_zero_poll_interval() {
    test_config_from_file(r#"poll_interval = 0"#, |_| {});
  }

  #[test]
  fn default_config_is_valid_toml() {
    let toml = Config::default_toml().unwrap();
    Jail::expect_with(|_| {
      let config = Config::from_toml_str(&toml).map_err(|err| err.to_string())?;
      assert_eq!(config.base_url().to_string(), DEFAULT_BASE_URL);
      assert_eq!(config.poll_interval(), Duration::from_secs(5));
      Ok(())
    });
  }
}
