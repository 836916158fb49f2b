//! Orchestration for the `license` subcommand.

use crate::error::{ReleaseError, Result};
use crate::fs::{ChangeKind, Changeset};
use crate::license::{collect_inventory, parse_inventory, render_attribution};

use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the `license` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LicenseArgs {
    /// Read the inventory from a `cargo license --json` dump instead of running it
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Attribution file to write
    #[arg(long, short = 'o', value_name = "FILE", default_value = "LICENSE.txt")]
    pub output: PathBuf,

    /// Path to the workspace Cargo.toml passed to cargo-license
    #[arg(long, value_name = "PATH", conflicts_with = "input")]
    pub manifest_path: Option<PathBuf>,

    /// Preview without writing the attribution file
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

/// Generates the third-party attribution file.
pub fn execute(args: LicenseArgs) -> Result<()> {
    let entries = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| ReleaseError::Io {
                path: path.clone(),
                source,
            })?;
            parse_inventory(&json)?
        }
        None => collect_inventory(args.manifest_path.as_deref())?,
    };

    println!(
        "{:>12} {} dependencies into {}",
        "Collecting".cyan().bold(),
        entries.len(),
        args.output.display()
    );

    let rendered = render_attribution(&entries);

    let mut changes = Changeset::new(args.dry_run);
    let original = match changes.read(&args.output) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(ReleaseError::Io {
                path: args.output.clone(),
                source,
            });
        }
    };
    changes.write(&args.output, &original, rendered, ChangeKind::Attribution)?;

    let root = args
        .output
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    changes.print_summary(&root);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INVENTORY: &str = r#"[{"name":"regex","version":"1.12.2","repository":"https://github.com/rust-lang/regex","license":"MIT OR Apache-2.0"}]"#;

    #[test]
    fn test_writes_attribution_from_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("licenses.json");
        let output = temp.path().join("LICENSE.txt");
        fs::write(&input, INVENTORY).unwrap();

        let args = LicenseArgs::parse_from([
            "license",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        execute(args).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("### regex 1.12.2\n"));
        assert!(text.contains("* license: MIT OR Apache-2.0\n"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("licenses.json");
        let output = temp.path().join("LICENSE.txt");
        fs::write(&input, INVENTORY).unwrap();

        let args = LicenseArgs::parse_from([
            "license",
            "--dry-run",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        execute(args).unwrap();

        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let temp = TempDir::new().unwrap();
        let args = LicenseArgs::parse_from([
            "license",
            "--input",
            temp.path().join("nope.json").to_str().unwrap(),
        ]);

        assert!(matches!(execute(args), Err(ReleaseError::Io { .. })));
    }
}
