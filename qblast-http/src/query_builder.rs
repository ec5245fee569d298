//! Building outbound parameter bags.
//!

use tracing::instrument;

use qblast_config::types::fields::{CMD, GAPCOSTS, RID};
use qblast_config::types::{Cmd, ParamValue, ParameterBag};

/// A helper struct to construct a [ParameterBag] from optional caller options.
#[derive(Debug)]
pub struct ParamsBuilder {
  params: ParameterBag,
}

impl ParamsBuilder {
  /// Create a builder with the command field set.
  pub fn new(cmd: Cmd) -> Self {
    let mut params = ParameterBag::new();
    params.insert(CMD, cmd);

    Self { params }
  }

  pub fn build(self) -> ParameterBag {
    self.params
  }

  /// Add an option under its upper-cased name. Absent options are skipped, anything else,
  /// including empty strings and zero, is kept.
  #[instrument(level = "trace", skip(self, value))]
  pub fn with_param(mut self, name: &str, value: Option<impl Into<ParamValue>>) -> Self {
    if let Some(value) = value {
      self.params.insert(name.to_uppercase(), value);
    }
    self
  }

  /// Add the gap costs as a single space separated token.
  pub fn with_gap_costs(self, gap_costs: Option<(i64, i64)>) -> Self {
    self.with_param(
      GAPCOSTS,
      gap_costs.map(|(existence, extension)| format!("{existence} {extension}")),
    )
  }

  /// Add the request id under the service's `RID` field.
  pub fn with_request_id(self, request_id: impl Into<String>) -> Self {
    self.with_param(RID, Some(request_id.into()))
  }
}
