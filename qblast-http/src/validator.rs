//! Rule set tables for submitting searches and retrieving results, with a single evaluator.
//!

use tracing::{instrument, trace};

use qblast_config::types::fields::*;
use qblast_config::types::{
  ALIGNMENT, COMPOSITION_BASED_STATISTICS_CODES, FILTER_PATTERN, FORMAT_TYPES, MATRICES, PROGRAMS,
  ParameterBag,
};

use crate::rules::PairSign::Positive;
use crate::rules::Rule;
use crate::rules::Rule::*;

/// An ordered list of fields and the rules that are checked against each of them.
pub type RuleSet = [(&'static str, &'static [Rule])];

/// Rules for submitting a search. The order determines the order of reported errors.
pub static SEARCH_RULES: &RuleSet = &[
  (QUERY, &[NotNone, NotEmpty]),
  (DATABASE, &[NotNone, NotEmpty]),
  (PROGRAM, &[NotNone, MemberOf(PROGRAMS)]),
  (FILTER, &[MatchesPattern(&FILTER_PATTERN)]),
  (FORMAT_TYPE, &[BlankOrMemberOf(FORMAT_TYPES)]),
  (EXPECT, &[GreaterThanZero]),
  (NUCL_REWARD, &[GreaterThanZero]),
  (NUCL_PENALTY, &[LessThanZero]),
  (GAPCOSTS, &[PairedIntegers(Positive)]),
  (MATRIX, &[MemberOf(MATRICES)]),
  (HITLIST_SIZE, &[GreaterThanZero]),
  (DESCRIPTIONS, &[GreaterThanZero]),
  (ALIGNMENTS, &[GreaterThanZero]),
  (NCBI_GI, &[NcbiGiFlag]),
  (THRESHOLD, &[GreaterThanZero]),
  (WORD_SIZE, &[GreaterThanZero]),
  (
    COMPOSITION_BASED_STATISTICS,
    &[MemberOf(COMPOSITION_BASED_STATISTICS_CODES)],
  ),
  (NUM_THREADS, &[GreaterThanZero]),
];

/// Rules for retrieving results.
pub static RESULTS_RULES: &RuleSet = &[
  (FORMAT_TYPE, &[BlankOrMemberOf(FORMAT_TYPES)]),
  (HITLIST_SIZE, &[GreaterThanZero]),
  (DESCRIPTIONS, &[GreaterThanZero]),
  (ALIGNMENTS, &[GreaterThanZero]),
  (NCBI_GI, &[NcbiGiFlag]),
  (FORMAT_OBJECT, &[AbsentOr(ALIGNMENT)]),
];

/// Evaluate every rule of the rule set, returning all error messages in rule set order.
#[instrument(level = "trace", skip_all, ret)]
pub fn validate(rules: &RuleSet, params: &ParameterBag) -> Vec<String> {
  rules
    .iter()
    .flat_map(|(field, field_rules)| {
      let value = params.get(field);
      trace!(field, value = ?value, "validating field");
      field_rules.iter().filter_map(move |rule| rule.check(field, value).err())
    })
    .collect()
}

/// Validate the parameters of a search submission.
pub fn validate_search_params(params: &ParameterBag) -> Vec<String> {
  validate(SEARCH_RULES, params)
}

/// Validate the parameters of a results retrieval.
pub fn validate_results_params(params: &ParameterBag) -> Vec<String> {
  validate(RESULTS_RULES, params)
}

#[cfg(test)]
mod tests {
  use qblast_config::types::ParamValue;

  use super::*;

  const NOT_EMPTY_ERROR: &str = "Parameter '{}' cannot be empty";
  const NOT_NONE_ERROR: &str = "Parameter '{}' must be specified";
  const INVALID_ERROR: &str = "Invalid '{}' parameter";

  fn error(template: &str, field: &str) -> String {
    template.replace("{}", field)
  }

  fn valid_required_params() -> ParameterBag {
    [("QUERY", "test"), ("DATABASE", "test_db"), ("PROGRAM", PROGRAMS[0])]
      .into_iter()
      .collect()
  }

  fn test_search_positive(field: &str, value: Option<impl Into<ParamValue>>) {
    let mut params = valid_required_params();
    if let Some(value) = value {
      params.insert(field, value);
    }
    assert_eq!(validate_search_params(&params), Vec::<String>::new(), "{field}");
  }

  fn test_search_negative(field: &str, value: impl Into<ParamValue>) {
    let mut params = valid_required_params();
    params.insert(field, value);
    assert_eq!(
      validate_search_params(&params),
      vec![error(INVALID_ERROR, &field.to_lowercase())]
    );
  }

  fn test_results_negative(field: &str, value: impl Into<ParamValue>) {
    let mut params = ParameterBag::new();
    params.insert(field, value);
    assert_eq!(
      validate_results_params(&params),
      vec![error(INVALID_ERROR, &field.to_lowercase())]
    );
  }

  #[test]
  fn all_required_params_missing() {
    assert_eq!(
      validate_search_params(&ParameterBag::new()),
      vec![
        error(NOT_NONE_ERROR, "query"),
        error(NOT_NONE_ERROR, "database"),
        error(NOT_NONE_ERROR, "program"),
      ]
    );
  }

  #[test]
  fn required_params() {
    for program in PROGRAMS {
      test_search_positive(PROGRAM, Some(*program));
    }

    let params = [("DATABASE", ""), ("PROGRAM", PROGRAMS[0])].into_iter().collect();
    assert_eq!(
      validate_search_params(&params),
      vec![error(NOT_NONE_ERROR, "query"), error(NOT_EMPTY_ERROR, "database")]
    );

    let params = [("QUERY", ""), ("PROGRAM", PROGRAMS[0])].into_iter().collect();
    assert_eq!(
      validate_search_params(&params),
      vec![error(NOT_EMPTY_ERROR, "query"), error(NOT_NONE_ERROR, "database")]
    );

    let params = [("QUERY", ""), ("PROGRAM", "xyz")].into_iter().collect();
    assert_eq!(
      validate_search_params(&params),
      vec![
        error(NOT_EMPTY_ERROR, "query"),
        error(NOT_NONE_ERROR, "database"),
        error(INVALID_ERROR, "program"),
      ]
    );
  }

  #[test]
  fn filter() {
    for value in ["F", "T", "L", "mT", "mL", ""] {
      test_search_positive(FILTER, Some(value));
    }
    test_search_positive(FILTER, None::<&str>);

    test_search_negative(FILTER, "X");
    test_search_negative(FILTER, "mF");
    test_search_negative(FILTER, "test123");
  }

  #[test]
  fn format_type() {
    for value in FORMAT_TYPES.iter().chain(&[""]) {
      test_search_positive(FORMAT_TYPE, Some(*value));
    }
    test_search_positive(FORMAT_TYPE, None::<&str>);

    test_search_negative(FORMAT_TYPE, "X");
    test_search_negative(FORMAT_TYPE, "Text2");
    test_search_negative(FORMAT_TYPE, "JSON");
  }

  #[test]
  fn greater_than_zero_fields() {
    for field in [
      EXPECT,
      NUCL_REWARD,
      HITLIST_SIZE,
      DESCRIPTIONS,
      ALIGNMENTS,
      THRESHOLD,
      WORD_SIZE,
      NUM_THREADS,
    ] {
      test_search_positive(field, Some(1));
      test_search_positive(field, Some(265));
      test_search_positive(field, None::<&str>);

      test_search_negative(field, 0);
      test_search_negative(field, -1);
      test_search_negative(field, -53);
    }
  }

  #[test]
  fn expect_fraction() {
    test_search_positive(EXPECT, Some(0.05));
    test_search_negative(EXPECT, -0.05);
  }

  #[test]
  fn nucl_penalty() {
    test_search_positive(NUCL_PENALTY, Some(-1));
    test_search_positive(NUCL_PENALTY, Some(-127));
    test_search_positive(NUCL_PENALTY, None::<&str>);

    test_search_negative(NUCL_PENALTY, 0);
    test_search_negative(NUCL_PENALTY, 1);
    test_search_negative(NUCL_PENALTY, 53);
  }

  #[test]
  fn gap_costs() {
    for value in ["11 1", "1 1", "256 84713"] {
      test_search_positive(GAPCOSTS, Some(value));
    }

    for value in ["-1 15", "0 15", "84 -5612", "84 8 5", "-621 -223487", "0 0"] {
      test_search_negative(GAPCOSTS, value);
    }
  }

  #[test]
  fn matrix() {
    for value in MATRICES {
      test_search_positive(MATRIX, Some(*value));
    }
    test_search_positive(MATRIX, None::<&str>);

    test_search_negative(MATRIX, "test");
  }

  #[test]
  fn ncbi_gi() {
    test_search_positive(NCBI_GI, Some("T"));
    test_search_positive(NCBI_GI, Some("F"));
    test_search_positive(NCBI_GI, None::<&str>);

    for value in ["", "X", "True", "False", "test123"] {
      test_search_negative(NCBI_GI, value);
    }
  }

  #[test]
  fn composition_based_statistics() {
    for value in 0..4 {
      test_search_positive(COMPOSITION_BASED_STATISTICS, Some(value));
    }

    for value in [4, 154, -1, -6481] {
      test_search_negative(COMPOSITION_BASED_STATISTICS, value);
    }
  }

  #[test]
  fn errors_keep_rule_set_order() {
    let params: ParameterBag = [
      ("NUM_THREADS", ParamValue::from(0)),
      ("FILTER", "X".into()),
      ("GAPCOSTS", "0 0".into()),
    ]
    .into_iter()
    .collect();

    assert_eq!(
      validate_search_params(&params),
      vec![
        error(NOT_NONE_ERROR, "query"),
        error(NOT_NONE_ERROR, "database"),
        error(NOT_NONE_ERROR, "program"),
        error(INVALID_ERROR, "filter"),
        error(INVALID_ERROR, "gapcosts"),
        error(INVALID_ERROR, "num_threads"),
      ]
    );
  }

  #[test]
  fn results_params_valid() {
    let params: ParameterBag = [
      ("CMD", ParamValue::from("Get")),
      ("RID", "1337".into()),
      ("FORMAT_TYPE", "XML2".into()),
      ("HITLIST_SIZE", ParamValue::from(10)),
      ("NCBI_GI", "T".into()),
      ("FORMAT_OBJECT", "Alignment".into()),
    ]
    .into_iter()
    .collect();

    assert!(validate_results_params(&params).is_empty());
    assert!(validate_results_params(&ParameterBag::new()).is_empty());
  }

  #[test]
  fn results_format_object() {
    test_results_negative(FORMAT_OBJECT, "xyz");
    test_results_negative(FORMAT_OBJECT, "");
    test_results_negative(FORMAT_OBJECT, "SearchInfo");
  }

  #[test]
  fn results_numeric_and_flags() {
    test_results_negative(HITLIST_SIZE, 0);
    test_results_negative(DESCRIPTIONS, -1);
    test_results_negative(ALIGNMENTS, -8);
    test_results_negative(NCBI_GI, "True");
    test_results_negative(FORMAT_TYPE, "Text2");
  }
}
