//! The job lifecycle: submitting a search, checking its status, retrieving its results and
//! waiting for a job to finish.
//!

use std::path::{Path, PathBuf};
use std::time::Duration;

use http::Uri;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use qblast_config::config::Config;
use qblast_config::types::fields::{FORMAT_OBJECT, RID as RID_FIELD};
use qblast_config::types::{Cmd, ParameterBag, SEARCH_INFO, Status};

use crate::error::{QBlastError, Result};
use crate::qblast_info::{QBlastInfo, RID, RTOE, STATUS};
use crate::query_builder::ParamsBuilder;
use crate::request::{ResultsOptions, SearchRequest};
use crate::sleep::{Sleep, TokioSleep};
use crate::transport::{ReqwestTransport, Transport};
use crate::validator::{validate_results_params, validate_search_params};

/// A submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
  rid: String,
  estimate: Duration,
}

impl JobHandle {
  pub fn new(rid: impl Into<String>, estimate: Duration) -> Self {
    Self {
      rid: rid.into(),
      estimate,
    }
  }

  /// Get the request id.
  pub fn rid(&self) -> &str {
    &self.rid
  }

  /// Get the estimated time until the job completes.
  pub fn estimate(&self) -> Duration {
    self.estimate
  }
}

/// Retrieved results, either held in memory or written to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
  InMemoryText(String),
  WrittenToPath(PathBuf),
}

impl Retrieved {
  /// Get the text if the results are held in memory.
  pub fn text(&self) -> Option<&str> {
    match self {
      Retrieved::InMemoryText(text) => Some(text),
      Retrieved::WrittenToPath(_) => None,
    }
  }

  /// Get the path if the results were written to a file.
  pub fn path(&self) -> Option<&Path> {
    match self {
      Retrieved::InMemoryText(_) => None,
      Retrieved::WrittenToPath(path) => Some(path),
    }
  }
}

fn check_errors(errors: Vec<String>) -> Result<()> {
  if errors.is_empty() {
    Ok(())
  } else {
    debug!(errors = ?errors, "parameters failed validation");
    Err(QBlastError::ValidationFailure(errors))
  }
}

/// A client for the search service, generic over the transport and the sleeper used while
/// waiting.
#[derive(Debug, Clone)]
pub struct QBlastClient<T, S = TokioSleep> {
  transport: T,
  sleep: S,
  base_url: Uri,
  poll_interval: Duration,
  results_file_path: PathBuf,
}

impl QBlastClient<ReqwestTransport> {
  /// Create a client which sends requests over http using the config.
  pub fn from_config(config: &Config) -> Result<Self> {
    Ok(Self::new(
      ReqwestTransport::from_config(config.http_client())?,
      TokioSleep,
      config,
    ))
  }
}

impl<T, S> QBlastClient<T, S>
where
  T: Transport + Send + Sync,
  S: Sleep + Send + Sync,
{
  /// Create a new client.
  pub fn new(transport: T, sleep: S, config: &Config) -> Self {
    Self {
      transport,
      sleep,
      base_url: config.base_url().inner().clone(),
      poll_interval: config.poll_interval(),
      results_file_path: config.results_file_path().to_path_buf(),
    }
  }

  /// Get the base url.
  pub fn base_url(&self) -> &Uri {
    &self.base_url
  }

  /// Get the poll interval.
  pub fn poll_interval(&self) -> Duration {
    self.poll_interval
  }

  async fn get_info(&self, params: &ParameterBag) -> Result<QBlastInfo> {
    let body = self
      .transport
      .get(&self.base_url, params)
      .await?
      .into_body()?;

    Ok(QBlastInfo::parse(&body))
  }

  /// Submit a search, returning the request id and the estimated time to completion.
  #[instrument(level = "debug", skip_all, ret)]
  pub async fn search(&self, request: &SearchRequest) -> Result<JobHandle> {
    let params = request.to_params();
    check_errors(validate_search_params(&params))?;

    let info = self.get_info(&params).await?;

    let rid = info.require(RID)?;
    let rtoe = info.require(RTOE)?;
    let estimate = rtoe.parse::<u64>().map_err(|err| {
      QBlastError::protocol_failure(format!("invalid `{RTOE}` value `{rtoe}`: {err}"))
    })?;

    debug!(rid, estimate, "search submitted");
    Ok(JobHandle::new(rid, Duration::from_secs(estimate)))
  }

  /// Check the status of a job.
  #[instrument(level = "debug", skip(self), ret)]
  pub async fn check_status(&self, rid: &str) -> Result<Status> {
    let params = ParamsBuilder::new(Cmd::Get)
      .with_param(FORMAT_OBJECT, Some(SEARCH_INFO))
      .with_param(RID_FIELD, Some(rid))
      .build();

    let info = self.get_info(&params).await?;

    info
      .require(STATUS)?
      .parse::<Status>()
      .map_err(|err| QBlastError::protocol_failure(err.to_string()))
  }

  /// Retrieve the results of a job. Bulk formats are written to the options' file path, or the
  /// configured default path, and that path is returned.
  #[instrument(level = "debug", skip(self), ret)]
  pub async fn results(&self, rid: &str, options: &ResultsOptions) -> Result<Retrieved> {
    let params = options.to_params(rid);
    check_errors(validate_results_params(&params))?;

    if options.is_bulk() {
      let path = options
        .results_file_path
        .clone()
        .unwrap_or_else(|| self.results_file_path.clone());

      let mut body = self
        .transport
        .get_stream(&self.base_url, &params)
        .await?
        .into_body()?;

      let mut file = File::create(&path).await?;
      let written = tokio::io::copy(&mut body, &mut file).await?;
      file.flush().await?;

      debug!(path = %path.display(), written, "results written to file");
      Ok(Retrieved::WrittenToPath(path))
    } else {
      let body = self
        .transport
        .get(&self.base_url, &params)
        .await?
        .into_body()?;

      Ok(Retrieved::InMemoryText(body))
    }
  }

  /// Sleep for the estimated time, then poll the status until the job is ready and retrieve its
  /// results. A job which can no longer complete is a terminal failure.
  #[instrument(level = "debug", skip(self, options))]
  pub async fn wait_for_results(
    &self,
    rid: &str,
    estimate: Duration,
    options: &ResultsOptions,
  ) -> Result<Retrieved> {
    check_errors(validate_results_params(&options.to_params(rid)))?;

    self.sleep.sleep(estimate).await;

    loop {
      match self.check_status(rid).await? {
        Status::Waiting => {
          debug!(rid, poll_interval = ?self.poll_interval, "job still waiting");
          self.sleep.sleep(self.poll_interval).await;
        }
        Status::Ready => return self.results(rid, options).await,
        status => {
          warn!(rid, %status, "job cannot complete");
          return Err(QBlastError::TerminalJobFailure {
            rid: rid.to_string(),
            status,
          });
        }
      }
    }
  }

  /// Wait for the results of a submitted job.
  pub async fn wait_for_job(&self, job: &JobHandle, options: &ResultsOptions) -> Result<Retrieved> {
    self
      .wait_for_results(job.rid(), job.estimate(), options)
      .await
  }
}
