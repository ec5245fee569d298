//! Stateless validation predicates, one per validation concern. Every rule receives the field
//! name and the raw value, if any, and either passes or returns a human readable message.
//!

use std::sync::LazyLock;

use regex::Regex;

use qblast_config::types::ParamValue;

/// The outcome of checking a single field against a single rule.
pub type Outcome = Result<(), String>;

/// Sign constraint applied to both halves of a paired integer value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PairSign {
  /// Both integers must be greater than zero.
  Positive,
  /// Both integers must be zero or greater.
  NonNegative,
}

impl PairSign {
  fn accepts(&self, value: i64) -> bool {
    match self {
      PairSign::Positive => value > 0,
      PairSign::NonNegative => value >= 0,
    }
  }
}

/// A single named rule, bound to fields in a rule set table.
#[derive(Debug, Copy, Clone)]
pub enum Rule {
  NotNone,
  NotEmpty,
  MemberOf(&'static [&'static str]),
  /// Like `MemberOf`, but an empty value is accepted too.
  BlankOrMemberOf(&'static [&'static str]),
  GreaterThanZero,
  LessThanZero,
  MatchesPattern(&'static LazyLock<Regex>),
  PairedIntegers(PairSign),
  NcbiGiFlag,
  /// The value must be absent or exactly this literal.
  AbsentOr(&'static str),
}

impl Rule {
  /// Check the value of a field against this rule.
  pub fn check(&self, field: &str, value: Option<&ParamValue>) -> Outcome {
    match self {
      Rule::NotNone => not_none(field, value),
      Rule::NotEmpty => not_empty(field, value),
      Rule::MemberOf(allowed) => member_of(field, value, allowed),
      Rule::BlankOrMemberOf(allowed) => blank_or_member_of(field, value, allowed),
      Rule::GreaterThanZero => greater_than_zero(field, value),
      Rule::LessThanZero => less_than_zero(field, value),
      Rule::MatchesPattern(pattern) => matches_pattern(field, value, pattern),
      Rule::PairedIntegers(sign) => paired_integers(field, value, *sign),
      Rule::NcbiGiFlag => ncbi_gi_flag(field, value),
      Rule::AbsentOr(literal) => absent_or(field, value, literal),
    }
  }
}

/// The message for a value that is present but not acceptable.
pub fn invalid(field: &str) -> String {
  format!("Invalid '{}' parameter", field.to_lowercase())
}

fn check(condition: bool, field: &str) -> Outcome {
  if condition { Ok(()) } else { Err(invalid(field)) }
}

/// Fails if the value is absent.
pub fn not_none(field: &str, value: Option<&ParamValue>) -> Outcome {
  match value {
    Some(_) => Ok(()),
    None => Err(format!(
      "Parameter '{}' must be specified",
      field.to_lowercase()
    )),
  }
}

/// Fails if the value is present but zero-length.
pub fn not_empty(field: &str, value: Option<&ParamValue>) -> Outcome {
  match value {
    Some(value) if value.is_empty() => Err(format!(
      "Parameter '{}' cannot be empty",
      field.to_lowercase()
    )),
    _ => Ok(()),
  }
}

/// Passes if the value is absent or one of the allowed literals.
pub fn member_of(field: &str, value: Option<&ParamValue>, allowed: &[&str]) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) => check(allowed.contains(&value.to_string().as_str()), field),
  }
}

/// Passes if the value is absent, empty, or one of the allowed literals.
pub fn blank_or_member_of(field: &str, value: Option<&ParamValue>, allowed: &[&str]) -> Outcome {
  match value {
    Some(value) if value.is_empty() => Ok(()),
    value => member_of(field, value, allowed),
  }
}

/// Passes if the value is absent or a number greater than zero.
pub fn greater_than_zero(field: &str, value: Option<&ParamValue>) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) => check(value.as_number().is_some_and(|n| n > 0.0), field),
  }
}

/// Passes if the value is absent or a number less than zero.
pub fn less_than_zero(field: &str, value: Option<&ParamValue>) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) => check(value.as_number().is_some_and(|n| n < 0.0), field),
  }
}

/// Passes if the value is absent, empty, or fully matched by the pattern.
pub fn matches_pattern(field: &str, value: Option<&ParamValue>, pattern: &Regex) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) if value.is_empty() => Ok(()),
    Some(value) => check(pattern.is_match(&value.to_string()), field),
  }
}

/// Passes if the value is absent or exactly two whitespace separated integers that both
/// satisfy the sign constraint.
pub fn paired_integers(field: &str, value: Option<&ParamValue>, sign: PairSign) -> Outcome {
  let Some(value) = value else {
    return Ok(());
  };

  let pair = value.as_text().and_then(|text| {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
      (Some(first), Some(second), None) => {
        Some((first.parse::<i64>().ok()?, second.parse::<i64>().ok()?))
      }
      _ => None,
    }
  });

  check(
    pair.is_some_and(|(first, second)| sign.accepts(first) && sign.accepts(second)),
    field,
  )
}

/// Passes if the value is absent or exactly `T` or `F`.
pub fn ncbi_gi_flag(field: &str, value: Option<&ParamValue>) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) => check(matches!(value.as_text(), Some("T") | Some("F")), field),
  }
}

/// Passes if the value is absent or exactly the literal.
pub fn absent_or(field: &str, value: Option<&ParamValue>, literal: &str) -> Outcome {
  match value {
    None => Ok(()),
    Some(value) => check(value.as_text() == Some(literal), field),
  }
}

#[cfg(test)]
mod tests {
  use qblast_config::types::{FILTER_PATTERN, MATRICES};

  use super::*;

  fn text(value: &str) -> Option<ParamValue> {
    Some(ParamValue::from(value))
  }

  #[test]
  fn not_none_messages() {
    assert_eq!(
      not_none("QUERY", None),
      Err("Parameter 'query' must be specified".to_string())
    );
    assert_eq!(not_none("QUERY", text("").as_ref()), Ok(()));
  }

  #[test]
  fn not_empty_messages() {
    assert_eq!(
      not_empty("DATABASE", text("").as_ref()),
      Err("Parameter 'database' cannot be empty".to_string())
    );
    assert_eq!(not_empty("DATABASE", None), Ok(()));
    assert_eq!(not_empty("DATABASE", text("nt").as_ref()), Ok(()));
  }

  #[test]
  fn member_of_values() {
    assert_eq!(member_of("MATRIX", None, MATRICES), Ok(()));
    assert_eq!(member_of("MATRIX", text("PAM30").as_ref(), MATRICES), Ok(()));
    assert_eq!(
      member_of("MATRIX", text("pam30").as_ref(), MATRICES),
      Err("Invalid 'matrix' parameter".to_string())
    );
    assert_eq!(
      member_of("MATRIX", text("").as_ref(), MATRICES),
      Err("Invalid 'matrix' parameter".to_string())
    );
    assert_eq!(blank_or_member_of("MATRIX", text("").as_ref(), MATRICES), Ok(()));
  }

  #[test]
  fn member_of_integers() {
    let allowed = &["0", "1", "2", "3"];
    assert_eq!(member_of("STATS", Some(&ParamValue::from(3)), allowed), Ok(()));
    assert!(member_of("STATS", Some(&ParamValue::from(4)), allowed).is_err());
  }

  #[test]
  fn greater_than_zero_values() {
    assert_eq!(greater_than_zero("EXPECT", None), Ok(()));
    assert_eq!(greater_than_zero("EXPECT", Some(&ParamValue::from(0.001))), Ok(()));
    assert_eq!(greater_than_zero("EXPECT", text("10").as_ref()), Ok(()));
    assert!(greater_than_zero("EXPECT", Some(&ParamValue::from(0))).is_err());
    assert!(greater_than_zero("EXPECT", Some(&ParamValue::from(-1))).is_err());
    assert_eq!(
      greater_than_zero("EXPECT", text("ten").as_ref()),
      Err("Invalid 'expect' parameter".to_string())
    );
  }

  #[test]
  fn less_than_zero_values() {
    assert_eq!(less_than_zero("NUCL_PENALTY", None), Ok(()));
    assert_eq!(less_than_zero("NUCL_PENALTY", Some(&ParamValue::from(-3))), Ok(()));
    assert!(less_than_zero("NUCL_PENALTY", Some(&ParamValue::from(0))).is_err());
    assert!(less_than_zero("NUCL_PENALTY", Some(&ParamValue::from(2))).is_err());
  }

  #[test]
  fn matches_pattern_values() {
    assert_eq!(matches_pattern("FILTER", None, &FILTER_PATTERN), Ok(()));
    assert_eq!(matches_pattern("FILTER", text("").as_ref(), &FILTER_PATTERN), Ok(()));
    assert_eq!(matches_pattern("FILTER", text("mL").as_ref(), &FILTER_PATTERN), Ok(()));
    assert_eq!(
      matches_pattern("FILTER", text("mF").as_ref(), &FILTER_PATTERN),
      Err("Invalid 'filter' parameter".to_string())
    );
  }

  #[test]
  fn paired_integers_strict() {
    for value in ["1 1", "11 1", "256 84713"] {
      assert_eq!(
        paired_integers("GAPCOSTS", text(value).as_ref(), PairSign::Positive),
        Ok(()),
        "{value}"
      );
    }
    for value in ["-1 15", "0 15", "84 -5612", "84 8 5", "0 0", "11", "a b", ""] {
      assert_eq!(
        paired_integers("GAPCOSTS", text(value).as_ref(), PairSign::Positive),
        Err("Invalid 'gapcosts' parameter".to_string()),
        "{value}"
      );
    }
  }

  #[test]
  fn paired_integers_relaxed() {
    assert_eq!(
      paired_integers("GAPCOSTS", text("0 0").as_ref(), PairSign::NonNegative),
      Ok(())
    );
    assert_eq!(
      paired_integers("GAPCOSTS", text("0 15").as_ref(), PairSign::NonNegative),
      Ok(())
    );
    assert!(paired_integers("GAPCOSTS", text("-1 15").as_ref(), PairSign::NonNegative).is_err());
  }

  #[test]
  fn paired_integers_not_text() {
    assert!(
      paired_integers("GAPCOSTS", Some(&ParamValue::from(11)), PairSign::Positive).is_err()
    );
    assert_eq!(paired_integers("GAPCOSTS", None, PairSign::Positive), Ok(()));
  }

  #[test]
  fn ncbi_gi_flag_values() {
    assert_eq!(ncbi_gi_flag("NCBI_GI", None), Ok(()));
    assert_eq!(ncbi_gi_flag("NCBI_GI", text("T").as_ref()), Ok(()));
    assert_eq!(ncbi_gi_flag("NCBI_GI", text("F").as_ref()), Ok(()));
    for value in ["", "t", "True", "False", "X"] {
      assert_eq!(
        ncbi_gi_flag("NCBI_GI", text(value).as_ref()),
        Err("Invalid 'ncbi_gi' parameter".to_string()),
        "{value}"
      );
    }
  }

  #[test]
  fn absent_or_literal() {
    assert_eq!(absent_or("FORMAT_OBJECT", None, "Alignment"), Ok(()));
    assert_eq!(
      absent_or("FORMAT_OBJECT", text("Alignment").as_ref(), "Alignment"),
      Ok(())
    );
    assert!(absent_or("FORMAT_OBJECT", text("SearchInfo").as_ref(), "Alignment").is_err());
  }

  #[test]
  fn rule_dispatch() {
    assert_eq!(
      Rule::PairedIntegers(PairSign::Positive).check("GAPCOSTS", text("0 0").as_ref()),
      Err("Invalid 'gapcosts' parameter".to_string())
    );
    assert_eq!(
      Rule::MatchesPattern(&FILTER_PATTERN).check("FILTER", text("T").as_ref()),
      Ok(())
    );
  }
}
