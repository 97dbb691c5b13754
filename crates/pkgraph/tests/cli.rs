//! Black-box tests of the `pkgraph` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn pkgraph() -> Command {
    let mut cmd = Command::cargo_bin("pkgraph").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PKGRAPH_LEVEL")
        .env_remove("PKGRAPH_LOG_FORMAT");
    cmd
}

fn library() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "package.json", r#"{"name": "mylib"}"#);
    write(root, "ng-package.json", r#"{"dest": "dist"}"#);
    write(root, "testing/package.json", r#"{"name": "mylib/testing"}"#);
    write(root, "testing/ng-package.json", "{}");
    temp_dir
}

#[test]
fn test_discover_json() {
    let temp_dir = library();

    let output = pkgraph()
        .arg("discover")
        .arg(temp_dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["primary"]["moduleId"], "mylib");
    assert_eq!(json["data"]["secondaries"][0]["moduleId"], "mylib/testing");
    assert_eq!(json["data"]["secondaries"][0]["isSecondary"], true);
    assert!(
        json["data"]["secondaries"][0]["destinationPath"]
            .as_str()
            .unwrap()
            .ends_with("testing")
    );
}

#[test]
fn test_discover_text_from_working_directory() {
    let temp_dir = library();

    pkgraph()
        .current_dir(temp_dir.path())
        .arg("discover")
        .assert()
        .success()
        .stdout(predicate::str::contains("mylib -> "))
        .stdout(predicate::str::contains("mylib/testing -> "));
}

#[test]
fn test_missing_manifest_exits_with_config_code() {
    let temp_dir = TempDir::new().unwrap();

    pkgraph()
        .arg("discover")
        .arg(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Package manifest not found"));
}

#[test]
fn test_config_error_as_json_envelope() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "package.json", r#"{"name": "mylib", "ngPackage": []}"#);

    let output = pkgraph()
        .arg("discover")
        .arg(temp_dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], "config");
}

#[test]
fn test_invalid_exclude_glob_is_config_error() {
    let temp_dir = library();

    pkgraph()
        .arg("discover")
        .arg(temp_dir.path())
        .args(["--exclude", "[oops"])
        .assert()
        .code(2);
}

#[test]
fn test_skipped_secondary_does_not_fail() {
    let temp_dir = library();
    write(temp_dir.path(), "broken/package.json", "{}");
    write(temp_dir.path(), "broken/ng-package.json", "{ not json");

    pkgraph()
        .arg("discover")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped (1):"));
}

#[test]
fn test_schema_command() {
    pkgraph()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dest\""))
        .stdout(predicate::str::contains("\"entryFile\""));
}

#[test]
fn test_unknown_subcommand_fails() {
    pkgraph().arg("build").assert().failure();
}
