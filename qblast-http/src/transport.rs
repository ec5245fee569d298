//! The HTTP boundary. Every request is a GET against one base url with flattened string query
//! parameters.
//!

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::io;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use http::{StatusCode, Uri};
use reqwest::Client;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tracing::{debug, instrument};

use qblast_config::http::client::HttpClientConfig;
use qblast_config::types::ParameterBag;

use crate::error::{QBlastError, Result};

/// A reader over a response body that is streamed rather than held in memory.
pub type BodyReader = Box<dyn AsyncRead + Send + Unpin>;

/// A response with the body read into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
  status: StatusCode,
  body: String,
}

impl TransportResponse {
  pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  /// Get the status code.
  pub fn status(&self) -> StatusCode {
    self.status
  }

  /// Get the body, failing if the status is not successful.
  pub fn into_body(self) -> Result<String> {
    if self.status.is_success() {
      Ok(self.body)
    } else {
      Err(QBlastError::unsuccessful_status(self.status))
    }
  }
}

/// A response with a body that can be read incrementally.
pub struct StreamingResponse {
  status: StatusCode,
  body: BodyReader,
}

impl StreamingResponse {
  pub fn new(status: StatusCode, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
    Self {
      status,
      body: Box::new(body),
    }
  }

  /// Get the status code.
  pub fn status(&self) -> StatusCode {
    self.status
  }

  /// Get the body reader, failing if the status is not successful.
  pub fn into_body(self) -> Result<BodyReader> {
    if self.status.is_success() {
      Ok(self.body)
    } else {
      Err(QBlastError::unsuccessful_status(self.status))
    }
  }
}

impl Debug for StreamingResponse {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("StreamingResponse")
      .field("status", &self.status)
      .finish_non_exhaustive()
  }
}

/// Issues GET requests to the service.
#[async_trait]
pub trait Transport {
  /// Send the request and read the whole body as text.
  async fn get(&self, url: &Uri, params: &ParameterBag) -> Result<TransportResponse>;

  /// Send the request and return the body as a byte stream.
  async fn get_stream(&self, url: &Uri, params: &ParameterBag) -> Result<StreamingResponse>;
}

/// A transport backed by a reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
  client: Client,
}

impl ReqwestTransport {
  /// Create a transport from an existing client.
  pub fn new(client: Client) -> Self {
    Self { client }
  }

  /// Create a transport from the client settings.
  pub fn from_config(config: &HttpClientConfig) -> Result<Self> {
    Ok(Self::new(config.build_client().map_err(|err| {
      QBlastError::transport_failure(format!("failed to build http client: {err}"))
    })?))
  }

  async fn send(&self, url: &Uri, params: &ParameterBag) -> Result<reqwest::Response> {
    debug!(%url, params = ?params, "sending request");

    Ok(
      self
        .client
        .get(url.to_string())
        .query(&params.to_query_pairs())
        .send()
        .await?,
    )
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  #[instrument(level = "trace", skip(self))]
  async fn get(&self, url: &Uri, params: &ParameterBag) -> Result<TransportResponse> {
    let response = self.send(url, params).await?;
    let status = response.status();

    Ok(TransportResponse::new(status, response.text().await?))
  }

  #[instrument(level = "trace", skip(self))]
  async fn get_stream(&self, url: &Uri, params: &ParameterBag) -> Result<StreamingResponse> {
    let response = self.send(url, params).await?;
    let status = response.status();

    Ok(StreamingResponse::new(
      status,
      StreamReader::new(response.bytes_stream().map_err(io::Error::other)),
    ))
  }
}
