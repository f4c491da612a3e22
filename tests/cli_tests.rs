use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a wildac command
fn wildac_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wildac"))
}

#[test]
fn test_help() {
    wildac_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Wildcard pattern search using an Aho-Corasick fragment automaton",
        ));
}

#[test]
fn test_version() {
    wildac_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wildac"));
}

#[test]
fn test_search_help() {
    wildac_cmd()
        .arg("search")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search a text for a wildcard pattern"));
}

#[test]
fn test_stdin_without_command() {
    wildac_cmd()
        .write_stdin("ababc a?a ?\n")
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_search_positional_tokens() {
    wildac_cmd()
        .args(["search", "ACGTTACAAT", "AC??T", "?"])
        .assert()
        .success()
        .stdout("1\n6\n");
}

#[test]
fn test_search_no_matches() {
    wildac_cmd()
        .args(["search", "xyz", "a?c", "?"])
        .assert()
        .success()
        .stdout("no matches\n");
}

#[test]
fn test_search_text_shorter_than_pattern() {
    wildac_cmd()
        .write_stdin("ab a?b?c ?")
        .assert()
        .success()
        .stdout("no matches\n");
}

#[test]
fn test_stdin_non_utf8_bytes() {
    wildac_cmd()
        .write_stdin(b"\xffab\xffab \xffa? ?".to_vec())
        .assert()
        .success()
        .stdout("1\n4\n");
}

#[test]
fn test_search_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("case.txt");
    fs::write(&input, "aaaaa\naa?aa\n?\n").unwrap();

    wildac_cmd()
        .arg("search")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_search_missing_file() {
    wildac_cmd()
        .args(["search", "--input", "/nonexistent/case.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read input"));
}

#[test]
fn test_only_wildcards_rejected() {
    wildac_cmd()
        .args(["search", "abc", "???", "?"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_multibyte_wildcard_rejected() {
    wildac_cmd()
        .args(["search", "abc", "a??", "??"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("wildcard must be a single byte"));
}

#[test]
fn test_wrong_token_count() {
    wildac_cmd()
        .write_stdin("abc a?c")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 3 whitespace-separated tokens"));
}

#[test]
fn test_json_output() {
    let output = wildac_cmd()
        .args(["search", "--format", "json", "ababc", "a?a", "?"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["positions"], serde_json::json!([1]));
    assert_eq!(value["match_count"], 1);
    assert_eq!(value["fragments"][1]["offset"], 2);
}

#[test]
fn test_json_output_empty() {
    let output = wildac_cmd()
        .args(["search", "--format", "json", "xyz", "a?a", "?"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["positions"], serde_json::json!([]));
    assert_eq!(value["match_count"], 0);
}

#[test]
fn test_invalid_format() {
    wildac_cmd()
        .args(["search", "--format", "xml", "ababc", "a?a", "?"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid output format"));
}

#[test]
fn test_quiet_exit_codes() {
    wildac_cmd()
        .args(["search", "--quiet", "ababc", "a?a", "?"])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    wildac_cmd()
        .args(["search", "--quiet", "xyz", "a?a", "?"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_trace_goes_to_stderr() {
    wildac_cmd()
        .args(["search", "--trace", "--dump", "ababc", "a?a", "?"])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("--- Automaton States ---"))
        .stderr(predicate::str::contains("full pattern match at position 1"))
        .stderr(predicate::str::contains("rejected position 3 (matched 1/2 fragments)"));
}

#[test]
fn test_inspect() {
    wildac_cmd()
        .args(["inspect", "ab?b", "?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fragments (2):"))
        .stdout(predicate::str::contains("0: \"ab\"@0"))
        .stdout(predicate::str::contains("1: \"b\"@3"));
}

#[test]
fn test_inspect_json() {
    let output = wildac_cmd()
        .args(["inspect", "--json", "ab?b", "?"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stats"]["node_count"], 4);
    assert_eq!(value["nodes"][2]["label"], "ab");
    assert_eq!(value["nodes"][2]["failure"], 3);
}

#[test]
fn test_validate() {
    wildac_cmd()
        .args(["validate", "ab?ab?ba", "?", "--text", "abababba"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VALIDATION PASSED"));
}

#[test]
fn test_validate_invalid_level() {
    wildac_cmd()
        .args(["validate", "ab", "?", "--level", "audit"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid validation level"));
}
