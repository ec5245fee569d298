//! Configuration related to the HTTP service endpoint and client.
//!

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use http::Uri as InnerUrl;
use serde::{Deserialize, Serialize};

use crate::error::Error::ParseError;
use crate::error::{Error, Result};

pub mod client;

/// The public CGI endpoint of the search service.
pub const DEFAULT_BASE_URL: &str = "https://blast.ncbi.nlm.nih.gov/Blast.cgi";

pub(crate) fn default_base_url() -> ValidatedUrl {
  ValidatedUrl(Url {
    inner: InnerUrl::from_static(DEFAULT_BASE_URL),
  })
}

/// A wrapper around `http::Uri` type which implements serialize and deserialize.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct Url {
  #[serde(with = "http_serde::uri")]
  pub(crate) inner: InnerUrl,
}

/// A new type struct on top of `http::Uri` which only allows http or https schemes when deserializing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Url")]
pub struct ValidatedUrl(pub(crate) Url);

impl From<InnerUrl> for ValidatedUrl {
  fn from(url: InnerUrl) -> Self {
    ValidatedUrl(Url { inner: url })
  }
}

impl ValidatedUrl {
  /// Get the inner url.
  pub fn inner(&self) -> &InnerUrl {
    &self.0.inner
  }

  /// Get the owned inner url.
  pub fn into_inner(self) -> InnerUrl {
    self.0.inner
  }
}

impl TryFrom<Url> for ValidatedUrl {
  type Error = Error;

  fn try_from(url: Url) -> Result<Self> {
    match url.inner.scheme() {
      Some(scheme) if scheme == "http" || scheme == "https" => Ok(Self(url)),
      _ => Err(ParseError("url scheme must be http or https".to_string())),
    }
  }
}

impl FromStr for ValidatedUrl {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let inner = InnerUrl::from_str(s).map_err(|err| ParseError(err.to_string()))?;
    Self::try_from(Url { inner })
  }
}

impl Display for ValidatedUrl {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.inner)
  }
}
