use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const REGISTRY: &str = r#"# test registry
[packages]
crate-a = "crates/crate-a/Cargo.toml"
crate-b = "crates/crate-b"
crate-c = "crates/crate-c/Cargo.toml"
"#;

pub const CRATE_A: &str = r#"[package]
name = "crate-a"
version = "1.0.0"
edition = "2021"
"#;

pub const CRATE_B: &str = r#"[package]
name = "crate-b"
# keep in sync with crate-a
version = "1.0.0"
edition = "2021"

[dependencies]
crate-a = { path = "../crate-a", version = "1.0.0" }
external-x = "3.1.0"

[dev-dependencies]
crate-c = { git = "https://github.com/hetudb/hetu", rev = "4f1c2a9" }
"#;

pub const CRATE_C: &str = r#"[package]
name = "crate-c"
version = "1.0.0"
edition = "2021"

[dependencies]
crate-a = { path = "../crate-a" }

[dev-dependencies.crate-b]
path = "../crate-b"
version = "1.0.0"
features = ["testing"]
"#;

pub const README: &str = r#"# HetuDB

```toml
[dependencies]
hetu = "1.0.0"
```

Preview builds:

```toml
hetu = "1.0.0-beta"
```
"#;

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// Creates a source tree with three registered crates, a registry file and
/// a README.
pub fn create_release_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "release.toml", REGISTRY);
    write(root, "crates/crate-a/Cargo.toml", CRATE_A);
    write(root, "crates/crate-b/Cargo.toml", CRATE_B);
    write(root, "crates/crate-c/Cargo.toml", CRATE_C);
    write(root, "README.md", README);

    temp
}

/// Runs `hetu-release bump` against the tree's registry file.
pub fn run_bump(root: &Path, version: &str, extra_args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("hetu-release");
    cmd.arg("bump")
        .arg(version)
        .arg("--root")
        .arg(root)
        .arg("--registry")
        .arg(root.join("release.toml"))
        .args(extra_args)
        .env("NO_COLOR", "1")
        .current_dir(root);

    cmd.assert()
}
