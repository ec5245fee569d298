use std::io;

use http::StatusCode;
use thiserror::Error;

use qblast_config::types::Status;

pub type Result<T> = core::result::Result<T, QBlastError>;

/// The errors that can occur while submitting, polling or retrieving a search.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QBlastError {
  /// One or more parameters failed validation. No request was sent.
  #[error("ValidationFailure: {}", .0.join(", "))]
  ValidationFailure(Vec<String>),
  /// The response did not contain an expected info block or key.
  #[error("ProtocolFailure: {0}")]
  ProtocolFailure(String),
  /// The service reported that the job cannot complete.
  #[error("TerminalJobFailure: job {rid} has status {status}")]
  TerminalJobFailure { rid: String, status: Status },
  #[error("TransportFailure: {0}")]
  TransportFailure(String),
  #[error("IoError: {0}")]
  IoError(String),
}

impl QBlastError {
  pub fn protocol_failure<S: Into<String>>(message: S) -> Self {
    Self::ProtocolFailure(message.into())
  }

  pub fn transport_failure<S: Into<String>>(message: S) -> Self {
    Self::TransportFailure(message.into())
  }

  /// A failure for a response with an unsuccessful status code.
  pub fn unsuccessful_status(status: StatusCode) -> Self {
    Self::TransportFailure(format!("service returned {status}"))
  }
}

impl From<reqwest::Error> for QBlastError {
  fn from(err: reqwest::Error) -> Self {
    Self::TransportFailure(err.to_string())
  }
}

impl From<io::Error> for QBlastError {
  fn from(err: io::Error) -> Self {
    Self::IoError(err.to_string())
  }
}

impl From<QBlastError> for io::Error {
  fn from(err: QBlastError) -> Self {
    io::Error::other(err.to_string())
  }
}
