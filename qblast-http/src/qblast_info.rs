//! Decoding of the `QBlastInfoBegin ... QBlastInfoEnd` key value blocks embedded in service
//! responses.
//!

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{instrument, trace};

use crate::error::{QBlastError, Result};

pub const RID: &str = "RID";
pub const RTOE: &str = "RTOE";
pub const STATUS: &str = "Status";

static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)QBlastInfoBegin(.*?)QBlastInfoEnd").expect("expected valid block regex")
});

/// The merged key value pairs of every info block in a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QBlastInfo {
  entries: HashMap<String, String>,
}

impl QBlastInfo {
  /// Parse all info blocks in the body. Later keys overwrite earlier ones, and a body without
  /// any block yields an empty map.
  #[instrument(level = "trace", skip_all, ret)]
  pub fn parse(body: &str) -> Self {
    let mut entries = HashMap::new();

    for block in BLOCK_PATTERN.captures_iter(body) {
      let Some(block) = block.get(1) else {
        continue;
      };

      for line in block.as_str().lines() {
        let line = line.trim();
        if line.is_empty() {
          continue;
        }

        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        trace!(key, value, "parsed info entry");
        entries.insert(key.trim().to_string(), value.trim().to_string());
      }
    }

    Self { entries }
  }

  /// Get the value of a key.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }

  /// Get the value of a key, failing if it is missing.
  pub fn require(&self, key: &str) -> Result<&str> {
    self.get(key).ok_or_else(|| {
      QBlastError::protocol_failure(format!("response is missing the `{key}` field"))
    })
  }

  /// The number of entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether no entries were found.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn into_inner(self) -> HashMap<String, String> {
    self.entries
  }
}
