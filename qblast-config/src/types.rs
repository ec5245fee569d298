//! Types shared by the qblast crates, such as parameter values, job statuses and the allowed
//! values accepted by the search service.
//!

use std::collections::BTreeMap;
use std::collections::btree_map::Iter;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;
use std::{fmt, result};

use regex::Regex;

use crate::error::Error;
use crate::error::Error::ParseError;

/// Names of the outbound query fields.
pub mod fields {
  pub const CMD: &str = "CMD";
  pub const RID: &str = "RID";
  pub const QUERY: &str = "QUERY";
  pub const DATABASE: &str = "DATABASE";
  pub const PROGRAM: &str = "PROGRAM";
  pub const FILTER: &str = "FILTER";
  pub const FORMAT_TYPE: &str = "FORMAT_TYPE";
  pub const FORMAT_OBJECT: &str = "FORMAT_OBJECT";
  pub const EXPECT: &str = "EXPECT";
  pub const NUCL_REWARD: &str = "NUCL_REWARD";
  pub const NUCL_PENALTY: &str = "NUCL_PENALTY";
  pub const GAPCOSTS: &str = "GAPCOSTS";
  pub const MATRIX: &str = "MATRIX";
  pub const HITLIST_SIZE: &str = "HITLIST_SIZE";
  pub const DESCRIPTIONS: &str = "DESCRIPTIONS";
  pub const ALIGNMENTS: &str = "ALIGNMENTS";
  pub const NCBI_GI: &str = "NCBI_GI";
  pub const THRESHOLD: &str = "THRESHOLD";
  pub const WORD_SIZE: &str = "WORD_SIZE";
  pub const COMPOSITION_BASED_STATISTICS: &str = "COMPOSITION_BASED_STATISTICS";
  pub const NUM_THREADS: &str = "NUM_THREADS";
}

/// Programs that a search can run.
pub const PROGRAMS: &[&str] = &[
  "blastn",
  "megablast",
  "blastp",
  "blastx",
  "tblastn",
  "tblastx",
];

/// Output formats for search results.
pub const FORMAT_TYPES: &[&str] = &["HTML", "Text", "XML", "XML2", "JSON2", "Tabular"];

/// Output formats which are delivered as an archive and written to a file.
pub const BULK_FORMAT_TYPES: &[&str] = &["XML2", "JSON2"];

/// The format used when retrieving results without an explicit format.
pub const DEFAULT_FORMAT_TYPE: &str = "HTML";

/// Scoring matrices for protein searches.
pub const MATRICES: &[&str] = &[
  "BLOSUM45", "BLOSUM50", "BLOSUM62", "BLOSUM80", "BLOSUM90", "PAM250", "PAM30", "PAM70",
];

/// Composition based statistics codes.
pub const COMPOSITION_BASED_STATISTICS_CODES: &[&str] = &["0", "1", "2", "3"];

/// The format object used to check the status of a job.
pub const SEARCH_INFO: &str = "SearchInfo";

/// The only format object a caller may request when retrieving results.
pub const ALIGNMENT: &str = "Alignment";

/// Low complexity filter tokens: `F`, `T`, `L`, `mT` or `mL`.
pub static FILTER_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new("^(?:F|m?[TL])$").expect("expected valid filter regex"));

/// Check whether a format type is written to a file instead of being returned in memory.
pub fn is_bulk_format(format_type: &str) -> bool {
  BULK_FORMAT_TYPES.contains(&format_type)
}

/// The command sent with every request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cmd {
  Put,
  Get,
}

impl Display for Cmd {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Cmd::Put => write!(f, "Put"),
      Cmd::Get => write!(f, "Get"),
    }
  }
}

/// A single parameter value, before it is flattened into a query string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
  Text(String),
  Integer(i64),
  Float(f64),
}

impl ParamValue {
  /// Get the numeric value, parsing text if necessary.
  pub fn as_number(&self) -> Option<f64> {
    match self {
      ParamValue::Text(text) => text.trim().parse().ok(),
      ParamValue::Integer(value) => Some(*value as f64),
      ParamValue::Float(value) => Some(*value),
    }
  }

  /// Get the text value if this is a text parameter.
  pub fn as_text(&self) -> Option<&str> {
    match self {
      ParamValue::Text(text) => Some(text),
      _ => None,
    }
  }

  /// Whether this is a zero-length text value.
  pub fn is_empty(&self) -> bool {
    matches!(self, ParamValue::Text(text) if text.is_empty())
  }
}

impl Display for ParamValue {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      ParamValue::Text(text) => write!(f, "{text}"),
      ParamValue::Integer(value) => write!(f, "{value}"),
      ParamValue::Float(value) => write!(f, "{value}"),
    }
  }
}

impl From<&str> for ParamValue {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<String> for ParamValue {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

impl From<&String> for ParamValue {
  fn from(value: &String) -> Self {
    Self::Text(value.clone())
  }
}

impl From<i64> for ParamValue {
  fn from(value: i64) -> Self {
    Self::Integer(value)
  }
}

impl From<i32> for ParamValue {
  fn from(value: i32) -> Self {
    Self::Integer(value.into())
  }
}

impl From<u32> for ParamValue {
  fn from(value: u32) -> Self {
    Self::Integer(value.into())
  }
}

impl From<f64> for ParamValue {
  fn from(value: f64) -> Self {
    Self::Float(value)
  }
}

impl From<Cmd> for ParamValue {
  fn from(cmd: Cmd) -> Self {
    Self::Text(cmd.to_string())
  }
}

/// The upper-case field names and values of a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
  params: BTreeMap<String, ParamValue>,
}

impl ParameterBag {
  /// Create an empty bag.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a value, returning the previous value of the field.
  pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
    self.params.insert(field.into(), value.into())
  }

  /// Get the value of a field.
  pub fn get(&self, field: &str) -> Option<&ParamValue> {
    self.params.get(field)
  }

  /// Get the value of a field if it is text.
  pub fn get_text(&self, field: &str) -> Option<&str> {
    self.get(field).and_then(ParamValue::as_text)
  }

  /// Whether the field is present.
  pub fn contains_key(&self, field: &str) -> bool {
    self.params.contains_key(field)
  }

  /// The number of fields.
  pub fn len(&self) -> usize {
    self.params.len()
  }

  /// Whether there are no fields.
  pub fn is_empty(&self) -> bool {
    self.params.is_empty()
  }

  /// Iterate over the fields in key order.
  pub fn iter(&self) -> Iter<'_, String, ParamValue> {
    self.params.iter()
  }

  /// Flatten the bag into string key value pairs for a query string.
  pub fn to_query_pairs(&self) -> Vec<(String, String)> {
    self
      .params
      .iter()
      .map(|(field, value)| (field.clone(), value.to_string()))
      .collect()
  }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterBag {
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    Self {
      params: iter
        .into_iter()
        .map(|(field, value)| (field.into(), value.into()))
        .collect(),
    }
  }
}

impl<'a> IntoIterator for &'a ParameterBag {
  type Item = (&'a String, &'a ParamValue);
  type IntoIter = Iter<'a, String, ParamValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// The status of a submitted job as reported by the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
  Waiting,
  Ready,
  Unknown,
  Failed,
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> result::Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "waiting" => Ok(Self::Waiting),
      "ready" => Ok(Self::Ready),
      "unknown" => Ok(Self::Unknown),
      "failed" => Ok(Self::Failed),
      status => Err(ParseError(format!("unrecognised job status: {status}"))),
    }
  }
}

impl Display for Status {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Status::Waiting => write!(f, "WAITING"),
      Status::Ready => write!(f, "READY"),
      Status::Unknown => write!(f, "UNKNOWN"),
      Status::Failed => write!(f, "FAILED"),
    }
  }
}
