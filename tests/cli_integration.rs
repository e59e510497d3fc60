//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. Generation itself needs
//! network access and API keys, so these stick to the offline surface.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the binary to test.
fn blogsmith() -> Command {
    Command::cargo_bin("blogsmith").unwrap()
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    blogsmith()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft blog posts"));
}

#[test]
fn test_short_help_flag() {
    blogsmith().arg("-h").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    blogsmith()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    blogsmith()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("diagram"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_show_prints_all_fields() {
    let dir = tempfile::tempdir().unwrap();
    blogsmith()
        .args(["config", "show"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("planner_provider"))
        .stdout(predicate::str::contains("writer_model"))
        .stdout(predicate::str::contains("max_search_depth"));
}

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    blogsmith()
        .args(["config", "show"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"searcher_provider\": \"tavily\""))
        .stdout(predicate::str::contains("\"number_of_blog_sections\": 5"));
}

// ============================================================================
// Diagram Command Tests
// ============================================================================

#[test]
fn test_diagram_command_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("debug_diagram.svg");

    blogsmith()
        .args(["diagram", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Diagram written to"));

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Test 1"));
    assert!(svg.contains("Test 2"));
}

#[test]
fn test_diagram_command_help() {
    blogsmith()
        .args(["diagram", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("card diagram"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    blogsmith()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blogsmith"));
}

// ============================================================================
// Generate Command Tests (offline surface only)
// ============================================================================

#[test]
fn test_generate_requires_topic() {
    blogsmith().arg("generate").assert().failure();
}

#[test]
fn test_generate_help_shows_overrides() {
    blogsmith()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sections"))
        .stdout(predicate::str::contains("--search-depth"))
        .stdout(predicate::str::contains("--planner-model"));
}

#[test]
fn test_generate_rejects_unknown_provider_before_network() {
    // An unsupported planner provider fails at model dispatch, no API keys
    // or network needed.
    let dir = tempfile::tempdir().unwrap();
    blogsmith()
        .args(["generate", "test topic", "--planner-provider", "mistral", "--sections", "1"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mistral"));
}
