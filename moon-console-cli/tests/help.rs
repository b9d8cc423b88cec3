use std::fs;

use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("moon-console");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("moon-console"))
        .stdout(contains("--origin"));
}

#[test]
fn command_line_beats_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "origin = \"https://moon.example.com\"\nlocale = \"zh-CN\"\n").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("moon-console");
    cmd.arg("--config")
        .arg(&path)
        .args(["--locale", "en", "--print-config"])
        .assert()
        .success()
        .stdout(contains("origin = \"https://moon.example.com\""))
        .stdout(contains("locale = \"en-US\""));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo::cargo_bin_cmd!("moon-console");
    cmd.arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("--print-config")
        .assert()
        .failure()
        .stderr(contains("absent.toml"));
}

#[test]
fn unknown_locale_is_rejected() {
    let mut cmd = cargo::cargo_bin_cmd!("moon-console");
    cmd.args(["--locale", "fr", "--print-config"])
        .assert()
        .failure()
        .stderr(contains("unknown locale"));
}
