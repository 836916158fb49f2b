//! Internal dependency version updates in `Cargo.toml` files.
//!
//! Every registered manifest is scanned as a consumer. Each declaration in
//! its dependency tables that refers to a registered package, and carries a
//! version, has that version set to the release version.
//!
//! # Rewritten
//!
//! ```toml
//! [dependencies]
//! hetu-error = { path = "../../common/error", version = "0.1.0" }
//! hetu-core = "0.1.0"
//! err = { package = "hetu-error", version = "0.1.0" }
//!
//! [dev-dependencies.hetu-query]
//! version = "0.1.0"
//!
//! [target.'cfg(unix)'.dependencies]
//! hetu-mywire = { version = "0.1.0" }
//! ```
//!
//! # Left alone
//!
//! ```toml
//! [dependencies]
//! hetu-cstore = { git = "https://github.com/hetudb/hetu", rev = "4f1c2a9" }
//! hetu-lstore = { path = "../lstore" }
//! serde = "1.0"
//! ```
//!
//! Git pins without a version have opted out of the release stream. Path-only
//! and workspace-inherited declarations have no version to set. Packages not
//! in the registry are external.

use crate::cargo::manifest::{DependencyTable, Manifest};
use crate::error::{ReleaseError, Result};
use crate::fs::{ChangeKind, Changeset};
use crate::registry::Registry;
use std::path::Path;

/// One rewritten declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub table: DependencyTable,
    pub key: String,
    pub package: String,
    pub previous: Option<String>,
}

/// Retargets internal dependency versions in a parsed manifest.
///
/// Tables and declarations are independent, so the order they are visited
/// in does not affect the result.
pub fn retarget_dependents(
    manifest: &mut Manifest,
    registry: &Registry,
    new_version: &str,
) -> Vec<DependencyUpdate> {
    let mut updates = Vec::new();

    for table in manifest.dependency_tables() {
        for decl in manifest.dependencies(&table) {
            if !registry.is_internal(&decl.package) {
                continue;
            }

            if manifest.is_pin_only(&table, &decl.key) {
                log::debug!("Skipping {} in [{}]: pinned by git", decl.key, table);
                continue;
            }

            if !manifest.has_dependency_version(&table, &decl.key) {
                log::debug!("Skipping {} in [{}]: no version field", decl.key, table);
                continue;
            }

            let previous = manifest
                .dependency_version(&table, &decl.key)
                .map(str::to_string);

            if manifest.set_dependency_version(&table, &decl.key, new_version) {
                updates.push(DependencyUpdate {
                    table: table.clone(),
                    key: decl.key,
                    package: decl.package,
                    previous,
                });
            }
        }
    }

    updates
}

/// Retargets internal dependency versions in manifest text.
///
/// # Errors
///
/// - `MalformedManifest`: `content` is not valid TOML
pub fn retarget_manifest_text(
    manifest_path: &Path,
    content: &str,
    registry: &Registry,
    new_version: &str,
) -> Result<(String, Vec<DependencyUpdate>)> {
    let mut manifest: Manifest = content
        .parse()
        .map_err(|source| ReleaseError::MalformedManifest {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    let updates = retarget_dependents(&mut manifest, registry, new_version);
    if updates.is_empty() {
        return Ok((content.to_string(), updates));
    }

    Ok((manifest.to_string(), updates))
}

/// Updates internal dependency versions in a consumer's `Cargo.toml`.
///
/// # Errors
///
/// - `MissingManifest`: manifest file does not exist
/// - `MalformedManifest`: manifest has invalid TOML syntax
/// - `Io`: manifest cannot be read or written
///
/// # Examples
///
/// ```no_run
/// # use hetu_release::cargo::dependency::update_dependent_manifest;
/// # use hetu_release::fs::Changeset;
/// # use hetu_release::registry::Registry;
/// # use std::path::Path;
/// # fn example() -> hetu_release::error::Result<()> {
/// let registry = Registry::builtin(".");
/// let mut changes = Changeset::new(false);
/// update_dependent_manifest(
///     Path::new("core/query/Cargo.toml"),
///     &registry,
///     "0.2.0",
///     &mut changes,
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn update_dependent_manifest(
    manifest_path: &Path,
    registry: &Registry,
    new_version: &str,
    changes: &mut Changeset,
) -> Result<Vec<DependencyUpdate>> {
    let content = changes
        .read(manifest_path)
        .map_err(|e| ReleaseError::manifest_read(manifest_path.to_path_buf(), e))?;

    let (updated, updates) = retarget_manifest_text(manifest_path, &content, registry, new_version)?;

    for update in &updates {
        log::debug!(
            "{}: [{}] {} {} → {}",
            manifest_path.display(),
            update.table,
            update.key,
            update.previous.as_deref().unwrap_or("?"),
            new_version
        );
    }

    if changes.write(manifest_path, &content, updated, ChangeKind::DependencyVersion)? {
        log::debug!("Updated dependent manifest: {}", manifest_path.display());
    } else {
        log::debug!("No changes needed for: {}", manifest_path.display());
    }

    Ok(updates)
}
