//! Command-line surface tests

use assert_cmd::Command;
use predicates::prelude::*;

fn autorip() -> Command {
    Command::cargo_bin("autorip").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    autorip()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rip"))
        .stdout(predicate::str::contains("identify"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_rip_requires_devpath() {
    autorip()
        .arg("rip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--devpath"));
}

#[test]
fn test_missing_config_file_fails() {
    autorip()
        .args(["--config", "/nonexistent/autorip.toml", "lookup", "--label", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file does not exist"));
}

#[test]
fn test_invalid_environment_value_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let config = temp.path().join("autorip.toml");
    std::fs::write(&config, "").unwrap();
    autorip()
        .args(["--config", config.to_str().unwrap(), "lookup", "--label", "X"])
        .env("AUTORIP_MIN_LENGTH", "ten")
        .assert()
        .failure()
        .stderr(predicate::str::contains("AUTORIP_MIN_LENGTH"));
}
