//! Binary-level tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_installer").unwrap();
    cmd.env_remove("INSTALLER_PLATFORM").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_options() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-compile"))
        .stdout(predicate::str::contains("--app-version"));
}

#[test]
fn missing_build_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .current_dir(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("installer.toml"));
}

#[test]
fn unsupported_platform_has_its_own_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .current_dir(dir.path())
        .arg("--config")
        .arg(fixture("installer.toml"))
        .args(["--platform", "linux"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unsupported platform"));

    assert!(!dir.path().join("dist").exists());
}

#[test]
fn zero_timeout_is_rejected() {
    bin()
        .arg("--config")
        .arg(fixture("installer.toml"))
        .args(["--timeout-secs", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout-secs"));
}

#[test]
fn malformed_build_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[app]\nname = \"Foo\"\nunknown = 1\n").unwrap();

    bin()
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad.toml"));
}

#[test]
fn skip_compile_without_tree_warns_then_fails() {
    let dir = tempfile::tempdir().unwrap();
    let dist = dir.path().join("out");

    bin()
        .current_dir(dir.path())
        .arg("--config")
        .arg(fixture("installer.toml"))
        .arg("--dist-path")
        .arg(&dist)
        .args(["--platform", "windows", "--skip-compile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("warning: reusing existing distribution tree"))
        .stderr(predicate::str::contains("compiler output not found"));
}
