//! End-to-end tests for `hetu-release license`.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::*;
use predicates::prelude::*;
use tempfile::TempDir;

const INVENTORY: &str = r#"[
  {"name": "clap", "version": "4.5.20", "repository": "https://github.com/clap-rs/clap", "license": "MIT OR Apache-2.0"},
  {"name": "aho-corasick", "version": "1.1.3", "repository": "https://github.com/BurntSushi/aho-corasick", "license": "Unlicense OR MIT"}
]"#;

#[test]
fn test_license_from_inventory_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "licenses.json", INVENTORY);

    let mut cmd = cargo_bin_cmd!("hetu-release");
    cmd.arg("license")
        .arg("--input")
        .arg("licenses.json")
        .env("NO_COLOR", "1")
        .current_dir(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 dependencies"));

    let text = read(root, "LICENSE.txt");
    assert!(text.contains("Copyright 2021 HetuDB."));
    assert!(text.contains("### clap 4.5.20\n* source: [https://github.com/clap-rs/clap](https://github.com/clap-rs/clap)\n* license: MIT OR Apache-2.0\n"));

    // Inventory order is kept.
    assert!(text.find("### clap").unwrap() < text.find("### aho-corasick").unwrap());
}

#[test]
fn test_license_custom_output() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "licenses.json", INVENTORY);

    let mut cmd = cargo_bin_cmd!("hetu-release");
    cmd.arg("license")
        .args(["--input", "licenses.json", "--output", "THIRD_PARTY.md"])
        .current_dir(root)
        .assert()
        .success();

    assert!(read(root, "THIRD_PARTY.md").contains("### aho-corasick 1.1.3\n"));
    assert!(!root.join("LICENSE.txt").exists());
}

#[test]
fn test_license_bad_inventory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "licenses.json", "{ not json");

    let mut cmd = cargo_bin_cmd!("hetu-release");
    cmd.arg("license")
        .args(["--input", "licenses.json"])
        .current_dir(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));

    assert!(!root.join("LICENSE.txt").exists());
}
