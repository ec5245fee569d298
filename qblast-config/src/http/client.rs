//! Settings used to build the HTTP client.
//!

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error::ConfigError;
use crate::error::Result;

/// Options for the HTTP client that talks to the search service.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpClientConfig {
  user_agent: Option<String>,
  timeout: Option<u64>,
}

impl HttpClientConfig {
  /// Create a new HttpClientConfig.
  pub fn new(user_agent: Option<String>, timeout: Option<u64>) -> Self {
    Self {
      user_agent,
      timeout,
    }
  }

  /// Get the user agent.
  pub fn user_agent(&self) -> Option<&str> {
    self.user_agent.as_deref()
  }

  /// Get the request timeout.
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout.map(Duration::from_secs)
  }

  /// Set the user agent string.
  pub fn with_user_agent(mut self, user_agent: String) -> Self {
    self.user_agent = Some(user_agent);
    self
  }

  /// Build a reqwest client from these options.
  pub fn build_client(&self) -> Result<Client> {
    let mut builder = Client::builder();

    if let Some(user_agent) = self.user_agent() {
      debug!(user_agent, "setting client user agent");
      builder = builder.user_agent(user_agent);
    }
    if let Some(timeout) = self.timeout() {
      debug!(timeout = ?timeout, "setting client timeout");
      builder = builder.timeout(timeout);
    }

    builder
      .build()
      .map_err(|err| ConfigError(format!("building http client: {err}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn http_client_timeout() {
    let config = HttpClientConfig::new(None, Some(30));
    assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    assert!(config.build_client().is_ok());
  }

  #[test]
  fn http_client_user_agent() {
    let config = HttpClientConfig::default().with_user_agent("qblast-test".to_string());
    assert_eq!(config.user_agent(), Some("qblast-test"));
    assert_eq!(config.timeout(), None);
    assert!(config.build_client().is_ok());
  }
}
