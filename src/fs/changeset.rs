//! File writes for a release run.
//!
//! Every pass reads and writes through a [`Changeset`]. Writes land on disk
//! one file at a time, as soon as the in-memory edit for that file is
//! complete. There is no rollback: files already written keep their new
//! content when a later file fails.
//!
//! ## Dry-Run Mode
//!
//! With `dry_run = true` nothing is written. New content is staged in memory
//! instead, and [`Changeset::read`] returns staged content, so a later pass
//! sees what an earlier pass would have written.
//!
//! ## Example
//!
//! ```no_run
//! # use hetu_release::fs::{ChangeKind, Changeset};
//! # use std::path::Path;
//! # fn example() -> hetu_release::error::Result<()> {
//! let mut changes = Changeset::new(false);
//! let path = Path::new("core/query/Cargo.toml");
//!
//! let original = changes.read(path)?;
//! let updated = original.replace("0.1.0", "0.2.0");
//! changes.write(path, &original, updated, ChangeKind::PackageVersion)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{ReleaseError, Result};

use colored::Colorize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// What a recorded write changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeKind {
    /// A package's own `[package].version`.
    PackageVersion,
    /// Version pins on internal dependencies.
    DependencyVersion,
    /// Version snippets in documentation.
    Documentation,
    /// Generated third-party attribution file.
    Attribution,
}

/// A recorded write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Reads and writes files for one run, recording what changed.
pub struct Changeset {
    dry_run: bool,
    staged: HashMap<PathBuf, String>,
    changes: Vec<Change>,
}

impl Changeset {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            staged: HashMap::new(),
            changes: Vec::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Distinct files touched by this run.
    pub fn files(&self) -> BTreeSet<&Path> {
        self.changes.iter().map(|c| c.path.as_path()).collect()
    }

    /// Current content of `path`: staged content in dry-run mode, else disk.
    ///
    /// The raw `io::Error` is returned so callers can map `NotFound` to the
    /// error kind that fits the file.
    pub fn read(&self, path: &Path) -> std::io::Result<String> {
        match self.staged.get(path) {
            Some(content) => Ok(content.clone()),
            None => fs::read_to_string(path),
        }
    }

    /// Writes `new_content` to `path` unless it equals `original`.
    ///
    /// Returns `Ok(false)` when nothing needed writing.
    pub fn write(
        &mut self,
        path: &Path,
        original: &str,
        new_content: String,
        kind: ChangeKind,
    ) -> Result<bool> {
        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(false);
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
            self.staged.insert(path.to_path_buf(), new_content);
        } else {
            fs::write(path, &new_content).map_err(|source| {
                log::error!("Failed to write {}: {}", path.display(), source);
                ReleaseError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            log::debug!("Updated: {}", path.display());
        }

        self.changes.push(Change {
            path: path.to_path_buf(),
            kind,
        });

        Ok(true)
    }

    /// Prints a grouped summary to stdout.
    ///
    /// Paths are shown relative to `root` with forward slashes.
    pub fn print_summary(&self, root: &Path) {
        if self.changes.is_empty() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        let display_path = |path: &Path| -> String {
            let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
            relative.to_string_lossy().replace('\\', "/")
        };

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        let groups = [
            (ChangeKind::PackageVersion, "📦", "Package versions"),
            (ChangeKind::DependencyVersion, "🔗", "Dependency versions"),
            (ChangeKind::Documentation, "📄", "Documentation"),
            (ChangeKind::Attribution, "⚖", "Attribution"),
        ];

        for (kind, icon, title) in groups {
            let paths: BTreeSet<String> = self
                .changes
                .iter()
                .filter(|c| c.kind == kind)
                .map(|c| display_path(&c.path))
                .collect();

            if paths.is_empty() {
                continue;
            }

            println!(
                "\n{} {} ({} file{})",
                icon.bold(),
                title,
                paths.len(),
                if paths.len() == 1 { "" } else { "s" }
            );
            for path in paths.iter().take(8) {
                if self.dry_run {
                    println!("   • {}", path.dimmed());
                } else {
                    println!("   {} {}", "✓".green(), path.dimmed());
                }
            }
            if paths.len() > 8 {
                println!(
                    "   {} {} more...",
                    if self.dry_run {
                        "•".to_string()
                    } else {
                        "✓".green().to_string()
                    },
                    paths.len() - 8
                );
            }
        }

        println!();
        let num_files = self.files().len();
        if self.dry_run {
            println!(
                "{} {} will be modified. Run without {} to apply.",
                num_files.to_string().cyan().bold(),
                if num_files > 1 { "files" } else { "file" },
                "--dry-run".cyan()
            );
        } else {
            println!(
                "{} Updated {} {}",
                "✓".green().bold(),
                num_files,
                if num_files > 1 { "files" } else { "file" }
            );
        }
    }
}
