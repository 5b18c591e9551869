//! End-to-end tests for the auxiliary CLIs, driven as real subprocesses.

use std::fs;
use std::os::unix::fs::PermissionsExt;

use assert_cmd::Command;
use predicates::prelude::*;

fn write_state_file(dir: &std::path::Path) {
    let state = r#"{
  "schema_version": 1,
  "agent_version": "1.0.0",
  "hostname": "host1.example.com",
  "timestamp": "2026-07-28T00:00:00Z",
  "checks": {
    "disk": {
      "status": "OK",
      "status_reason": "Check 'disk' set the state to OK",
      "timestamp": "2026-07-28T00:00:00Z",
      "repeat_count": 0,
      "message": "38% used"
    },
    "memcache": {
      "status": "Critical",
      "status_reason": "Check 'memcache' set the state to Critical",
      "timestamp": "2026-07-28T00:00:00Z",
      "repeat_count": 0,
      "message": "connection refused"
    }
  }
}"#;
    fs::write(dir.join("state.json"), state).unwrap();
}

#[test]
fn status_prints_each_check_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_state_file(dir.path());

    Command::cargo_bin("pulsewatch-status")
        .unwrap()
        .args(["--data-directory", dir.path().to_str().unwrap()])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("disk"))
        .stdout(predicate::str::contains("memcache"))
        .stdout(predicate::str::contains("Critical"));
}

#[test]
fn status_exits_nonzero_when_state_file_missing() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("pulsewatch-status")
        .unwrap()
        .args(["--data-directory", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn status_warns_when_snapshot_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let state = r#"{
  "schema_version": 1,
  "agent_version": "1.0.0",
  "hostname": "host1",
  "timestamp": "2000-01-01T00:00:00Z",
  "checks": {}
}"#;
    fs::write(dir.path().join("state.json"), state).unwrap();

    Command::cargo_bin("pulsewatch-status")
        .unwrap()
        .args(["--data-directory", dir.path().to_str().unwrap(), "--interval", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stale"));
}

fn write_executable(path: &std::path::Path, body: &str) {
    fs::write(path, body).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[test]
fn inventory_symlinks_only_zero_exit_candidates() {
    let library = tempfile::tempdir().unwrap();
    let plugins = tempfile::tempdir().unwrap();

    write_executable(&library.path().join("good-check"), "#!/bin/sh\nexit 0\n");
    write_executable(&library.path().join("bad-check"), "#!/bin/sh\nexit 1\n");

    Command::cargo_bin("pulsewatch-inventory")
        .unwrap()
        .args([
            "--library-directory",
            library.path().to_str().unwrap(),
            "--plugin-directory",
            plugins.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("adopted 1, skipped 0"));

    assert!(plugins.path().join("good-check").symlink_metadata().is_ok());
    assert!(plugins.path().join("bad-check").symlink_metadata().is_err());
}

#[test]
fn inventory_never_clobbers_a_foreign_symlink() {
    let library = tempfile::tempdir().unwrap();
    let plugins = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();

    write_executable(&library.path().join("good-check"), "#!/bin/sh\nexit 0\n");
    let decoy_target = elsewhere.path().join("unrelated");
    fs::write(&decoy_target, "not a check").unwrap();
    std::os::unix::fs::symlink(&decoy_target, plugins.path().join("good-check")).unwrap();

    Command::cargo_bin("pulsewatch-inventory")
        .unwrap()
        .args([
            "--library-directory",
            library.path().to_str().unwrap(),
            "--plugin-directory",
            plugins.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let link_target = fs::read_link(plugins.path().join("good-check")).unwrap();
    assert_eq!(link_target, decoy_target);
}
