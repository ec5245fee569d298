use std::path::{Path, PathBuf};

use tempfile::TempDir;

use qblast_config::config::Config;

/// Render a response body containing one info block with the entries, wrapped in an html
/// comment like the service does.
pub fn qblast_info_body(entries: &[(&str, &str)]) -> String {
  let lines: String = entries
    .iter()
    .map(|(key, value)| format!("    {key}={value}\n"))
    .collect();

  format!("<html>\n<!--QBlastInfoBegin\n{lines}QBlastInfoEnd\n-->\n</html>\n")
}

/// The body returned for a submission.
pub fn submission_body(rid: &str, rtoe: &str) -> String {
  qblast_info_body(&[("RID", rid), ("RTOE", rtoe)])
}

/// The body returned for a status check.
pub fn status_body(status: &str) -> String {
  qblast_info_body(&[("Status", status)])
}

/// The body returned when retrieving results in the format.
pub fn results_body(format_type: &str) -> String {
  format!("{format_type}_RESPONSE")
}

/// A config with a short poll interval for tests.
pub fn test_config() -> Config {
  Config::from_toml_str("poll_interval = 1").expect("expected valid test config")
}

/// Create a temporary directory and a results path inside it.
pub fn temp_results_path(file_name: &str) -> (TempDir, PathBuf) {
  let dir = TempDir::new().expect("expected temporary directory");
  let path = dir.path().join(file_name);

  (dir, path)
}

/// Read a results file written by a bulk retrieval.
pub fn read_results(path: &Path) -> String {
  std::fs::read_to_string(path).expect("expected results file")
}
