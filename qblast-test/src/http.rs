//! A scripted transport and a recording sleeper, so that the job lifecycle can be tested without
//! network access or real delays.
//!

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use http::{StatusCode, Uri};

use qblast_config::types::fields::{CMD, FORMAT_OBJECT, FORMAT_TYPE};
use qblast_config::types::{DEFAULT_FORMAT_TYPE, ParameterBag, SEARCH_INFO};
use qblast_http::{Result, Sleep, StreamingResponse, Transport, TransportResponse};

use crate::util::{results_body, status_body, submission_body};

/// A request seen by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
  pub url: Uri,
  pub params: ParameterBag,
  pub streamed: bool,
}

#[derive(Debug)]
struct MockState {
  requests: Vec<RecordedRequest>,
  statuses: VecDeque<String>,
  put_body: String,
  status_code: StatusCode,
}

impl Default for MockState {
  fn default() -> Self {
    Self {
      requests: vec![],
      statuses: VecDeque::new(),
      put_body: submission_body("1337", "17"),
      status_code: StatusCode::OK,
    }
  }
}

/// A transport which answers like the search service and records every request.
///
/// Submissions return `RID=1337` and `RTOE=17`, status checks return the scripted statuses in
/// order and then `READY`, and results return `<FORMAT_TYPE>_RESPONSE`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
  state: Arc<Mutex<MockState>>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  fn state(&self) -> MutexGuard<'_, MockState> {
    self.state.lock().unwrap_or_else(|err| err.into_inner())
  }

  /// Script the statuses returned by successive status checks.
  pub fn with_statuses<I, S>(self, statuses: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.state().statuses = statuses.into_iter().map(Into::into).collect();
    self
  }

  /// Set the body returned for submissions.
  pub fn with_put_body(self, body: impl Into<String>) -> Self {
    self.state().put_body = body.into();
    self
  }

  /// Set the status code returned for every request.
  pub fn with_status_code(self, status_code: StatusCode) -> Self {
    self.state().status_code = status_code;
    self
  }

  /// Get all requests in the order they were sent.
  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.state().requests.clone()
  }

  /// Get the parameters of all requests.
  pub fn sent_params(&self) -> Vec<ParameterBag> {
    self
      .requests()
      .into_iter()
      .map(|request| request.params)
      .collect()
  }

  /// Get the parameters of the last request.
  pub fn last_params(&self) -> Option<ParameterBag> {
    self.sent_params().pop()
  }

  fn respond(&self, url: &Uri, params: &ParameterBag, streamed: bool) -> (StatusCode, String) {
    let mut state = self.state();
    state.requests.push(RecordedRequest {
      url: url.clone(),
      params: params.clone(),
      streamed,
    });

    let body = if params.get_text(CMD) == Some("Put") {
      state.put_body.clone()
    } else if params.get_text(FORMAT_OBJECT) == Some(SEARCH_INFO) {
      let status = state
        .statuses
        .pop_front()
        .unwrap_or_else(|| "READY".to_string());
      status_body(&status)
    } else {
      results_body(params.get_text(FORMAT_TYPE).unwrap_or(DEFAULT_FORMAT_TYPE))
    };

    (state.status_code, body)
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn get(&self, url: &Uri, params: &ParameterBag) -> Result<TransportResponse> {
    let (status, body) = self.respond(url, params, false);
    Ok(TransportResponse::new(status, body))
  }

  async fn get_stream(&self, url: &Uri, params: &ParameterBag) -> Result<StreamingResponse> {
    let (status, body) = self.respond(url, params, true);
    Ok(StreamingResponse::new(status, Cursor::new(body.into_bytes())))
  }
}

/// A sleeper which records the requested durations and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleep {
  sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleep {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get every requested duration in order.
  pub fn sleeps(&self) -> Vec<Duration> {
    self
      .sleeps
      .lock()
      .unwrap_or_else(|err| err.into_inner())
      .clone()
  }

  /// Get the total time that would have been slept.
  pub fn total(&self) -> Duration {
    self.sleeps().into_iter().sum()
  }
}

#[async_trait]
impl Sleep for RecordingSleep {
  async fn sleep(&self, duration: Duration) {
    self
      .sleeps
      .lock()
      .unwrap_or_else(|err| err.into_inner())
      .push(duration);
  }
}
