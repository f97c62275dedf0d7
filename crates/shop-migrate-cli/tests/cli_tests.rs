//! CLI integration tests for shop-migrate.
//!
//! These tests verify command-line argument parsing, help output, exit
//! codes, and the premapping → confirm → convert workflow against dumps in
//! a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the shop-migrate binary.
fn cmd() -> Command {
    Command::cargo_bin("shop-migrate").unwrap()
}

/// Write a config plus source/destination dumps into a fresh directory.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        r#"
connection:
  id: conn-1
  profile: shopware55
source:
  dump: source.json
destination:
  dump: destination.json
mapping:
  store: mappings.json
conversion:
  fields:
    id: productNumber
    name: name
"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("source.json"),
        r#"{
  "s_articles_supplier": [
    {"id": "7", "name": "Shopware"},
    {"id": "8", "name": "Acme"}
  ],
  "s_articles": [
    {"id": "1", "name": "Chair", "manufacturer": {"id": "7"}},
    {"id": "2", "name": "Desk", "manufacturer": {"id": "8"}}
  ]
}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("destination.json"),
        r#"[{"id": "u-acme", "name": "Acme Inc"}, {"id": "u-123", "name": "shopware AG"}]"#,
    )
    .unwrap();
    dir
}

fn config_arg(dir: &Path) -> String {
    dir.join("config.yaml").to_str().unwrap().to_string()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("premapping"))
        .stdout(predicate::str::contains("confirm"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_confirm_subcommand_help() {
    cmd()
        .args(["confirm", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn test_convert_subcommand_help() {
    cmd()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--table"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shop-migrate"));
}

#[test]
fn test_global_flag_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("[default: info]"))
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "check"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  id: conn-1").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_product_table_exits_with_code_3() {
    let dir = workspace();
    std::fs::write(dir.path().join("source.json"), r#"{"s_articles_supplier": []}"#).unwrap();

    cmd()
        .args(["--config", &config_arg(dir.path()), "convert"])
        .assert()
        .code(3);
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[test]
fn test_check_reports_plan() {
    let dir = workspace();
    cmd()
        .args(["--config", &config_arg(dir.path()), "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("swag_manufacturer"));
}

#[test]
fn test_premapping_preselects_shopware() {
    let dir = workspace();
    cmd()
        .args(["--config", &config_arg(dir.path()), "--output-json", "premapping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"destinationUuid\": \"u-123\""))
        .stdout(predicate::str::contains("\"entity\": \"swag_manufacturer\""));
}

#[test]
fn test_premapping_confirm_convert_workflow() {
    let dir = workspace();
    let config = config_arg(dir.path());

    let output = cmd()
        .args(["--config", &config, "--output-json", "premapping"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // Operator picks a destination for the open entry.
    let mut tables: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    tables[0]["mapping"][1]["destinationUuid"] = serde_json::json!("u-acme");
    let confirmed = dir.path().join("confirmed.json");
    std::fs::write(&confirmed, serde_json::to_string(&tables).unwrap()).unwrap();

    cmd()
        .args(["--config", &config, "confirm", "--file", confirmed.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 confirmed premapping entries"));
    assert!(dir.path().join("mappings.json").exists());

    cmd()
        .args(["--config", &config, "--output-json", "convert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"manufacturerId\": \"u-123\""))
        .stdout(predicate::str::contains("\"manufacturerId\": \"u-acme\""))
        .stdout(predicate::str::contains("\"unresolved_references\": 0"));
}

#[test]
fn test_convert_table_override() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("source.json"),
        r#"{
  "s_articles_supplier": [{"id": "7", "name": "Shopware"}],
  "s_articles_archive": [
    {"id": "9", "name": "Stool", "manufacturer": {"id": "7"}}
  ]
}"#,
    )
    .unwrap();

    cmd()
        .args([
            "--config",
            &config_arg(dir.path()),
            "--output-json",
            "convert",
            "--table",
            "s_articles_archive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"productNumber\": \"9\""))
        .stdout(predicate::str::contains("\"unresolved_references\": 1"));
}

#[test]
fn test_convert_without_confirmation_drops_references() {
    let dir = workspace();
    cmd()
        .args(["--config", &config_arg(dir.path()), "convert"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Records: 2/2"))
        .stdout(predicate::str::contains("Unresolved manufacturer references: 2"));
}
