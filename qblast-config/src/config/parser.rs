//! Layer the default config, a TOML source and `QBLAST_` environment variables.
//!

use std::fmt::Debug;
use std::path::Path;

use figment::Figment;
use figment::providers::{Data, Env, Format, Serialized, Toml};
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::error::Error::ParseError;
use crate::error::Result;

const ENVIRONMENT_VARIABLE_PREFIX: &str = "QBLAST_";

/// Tables nested inside the config. An env key starting with `<table>_` is split into
/// `<table>.<field>`.
const NESTED_TABLES: &[&str] = &["http_client"];

/// Where the TOML part of the config comes from.
#[derive(Debug)]
pub enum Parser<'a> {
  String(&'a str),
  Path(&'a Path),
}

fn env_key(key: &str) -> String {
  let key = key.to_lowercase();

  NESTED_TABLES
    .iter()
    .find_map(|table| {
      key
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .map(|field| format!("{table}.{field}"))
    })
    .unwrap_or(key)
}

fn env_provider() -> Env {
  Env::prefixed(ENVIRONMENT_VARIABLE_PREFIX)
    .filter(|key| key != "config")
    .map(|key| env_key(key.as_str()).into())
}

impl Parser<'_> {
  fn toml(&self) -> Data<Toml> {
    match self {
      Parser::String(string) => Toml::string(string),
      Parser::Path(path) => Toml::file(path),
    }
  }

  /// Extract a config value from the defaults, then the TOML source, then the environment.
  pub fn deserialize_config_into<T>(&self) -> Result<T>
  where
    for<'de> T: Deserialize<'de> + Debug,
  {
    let config: T = Figment::from(Serialized::defaults(Config::default()))
      .merge(self.toml())
      .merge(env_provider())
      .extract()
      .map_err(|err| ParseError(format!("failed to parse config: {err}")))?;

    info!(config = ?config, "config created");
    Ok(config)
  }
}

/// Read a config value from a TOML file.
pub fn from_path<T>(path: &Path) -> Result<T>
where
  for<'a> T: Deserialize<'a> + Debug,
{
  Parser::Path(path).deserialize_config_into()
}

/// Read a config value from a TOML string.
pub fn from_str<T>(str: &str) -> Result<T>
where
  for<'a> T: Deserialize<'a> + Debug,
{
  Parser::String(str).deserialize_config_into()
}
