//! Caller facing request options for searches and results retrieval.
//!

use std::path::PathBuf;

use tracing::instrument;

use qblast_config::types::fields::*;
use qblast_config::types::{Cmd, DEFAULT_FORMAT_TYPE, ParameterBag, is_bulk_format};

use crate::query_builder::ParamsBuilder;

/// A search submission. The query, database and program are required by the service, but are
/// optional here so that their absence is reported by validation rather than rejected up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
  pub query: Option<String>,
  pub database: Option<String>,
  pub program: Option<String>,
  pub options: SearchOptions,
}

/// Optional tuning options for a search submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
  pub filter: Option<String>,
  pub format_type: Option<String>,
  pub expect: Option<f64>,
  pub nucl_reward: Option<i64>,
  pub nucl_penalty: Option<i64>,
  /// Gap existence and extension costs.
  pub gapcosts: Option<(i64, i64)>,
  pub matrix: Option<String>,
  pub hitlist_size: Option<i64>,
  pub descriptions: Option<i64>,
  pub alignments: Option<i64>,
  pub ncbi_gi: Option<String>,
  pub threshold: Option<i64>,
  pub word_size: Option<i64>,
  pub composition_based_statistics: Option<i64>,
  pub num_threads: Option<i64>,
}

impl SearchRequest {
  /// Create a search request from the required fields.
  pub fn new(
    query: impl Into<String>,
    database: impl Into<String>,
    program: impl Into<String>,
  ) -> Self {
    Self {
      query: Some(query.into()),
      database: Some(database.into()),
      program: Some(program.into()),
      options: SearchOptions::default(),
    }
  }

  /// Set the options.
  pub fn with_options(mut self, options: SearchOptions) -> Self {
    self.options = options;
    self
  }

  /// Build the outbound parameters for a `Put` command.
  #[instrument(level = "trace", skip_all, ret)]
  pub fn to_params(&self) -> ParameterBag {
    let options = &self.options;

    ParamsBuilder::new(Cmd::Put)
      .with_param(QUERY, self.query.as_ref())
      .with_param(DATABASE, self.database.as_ref())
      .with_param(PROGRAM, self.program.as_ref())
      .with_param(FILTER, options.filter.as_ref())
      .with_param(FORMAT_TYPE, options.format_type.as_ref())
      .with_param(EXPECT, options.expect)
      .with_param(NUCL_REWARD, options.nucl_reward)
      .with_param(NUCL_PENALTY, options.nucl_penalty)
      .with_gap_costs(options.gapcosts)
      .with_param(MATRIX, options.matrix.as_ref())
      .with_param(HITLIST_SIZE, options.hitlist_size)
      .with_param(DESCRIPTIONS, options.descriptions)
      .with_param(ALIGNMENTS, options.alignments)
      .with_param(NCBI_GI, options.ncbi_gi.as_ref())
      .with_param(THRESHOLD, options.threshold)
      .with_param(WORD_SIZE, options.word_size)
      .with_param(
        COMPOSITION_BASED_STATISTICS,
        options.composition_based_statistics,
      )
      .with_param(NUM_THREADS, options.num_threads)
      .build()
  }
}

/// Options for retrieving the results of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsOptions {
  /// Defaults to `HTML` when unset.
  pub format_type: Option<String>,
  pub hitlist_size: Option<i64>,
  pub descriptions: Option<i64>,
  pub alignments: Option<i64>,
  pub ncbi_gi: Option<String>,
  pub format_object: Option<String>,
  /// Where bulk results are written. This is never sent to the service.
  pub results_file_path: Option<PathBuf>,
}

impl ResultsOptions {
  /// Set the format type.
  pub fn with_format_type(mut self, format_type: impl Into<String>) -> Self {
    self.format_type = Some(format_type.into());
    self
  }

  /// Set the path that bulk results are written to.
  pub fn with_results_file_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.results_file_path = Some(path.into());
    self
  }

  /// Get the format type that will be requested. A blank format type counts as unset.
  pub fn format_type(&self) -> &str {
    self
      .format_type
      .as_deref()
      .filter(|format_type| !format_type.is_empty())
      .unwrap_or(DEFAULT_FORMAT_TYPE)
  }

  /// Whether the requested format is streamed to a file.
  pub fn is_bulk(&self) -> bool {
    is_bulk_format(self.format_type())
  }

  /// Build the outbound parameters for a `Get` command for the request id.
  #[instrument(level = "trace", skip(self), ret)]
  pub fn to_params(&self, request_id: &str) -> ParameterBag {
    ParamsBuilder::new(Cmd::Get)
      .with_request_id(request_id)
      .with_param(FORMAT_TYPE, Some(self.format_type()))
      .with_param(HITLIST_SIZE, self.hitlist_size)
      .with_param(DESCRIPTIONS, self.descriptions)
      .with_param(ALIGNMENTS, self.alignments)
      .with_param(NCBI_GI, self.ncbi_gi.as_ref())
      .with_param(FORMAT_OBJECT, self.format_object.as_ref())
      .build()
  }
}
