//! Package manifest (`Cargo.toml`) version updates.
//!
//! Handles the `[package]` section of a registered crate's manifest.

use crate::cargo::manifest::Manifest;
use crate::error::{ReleaseError, Result};
use crate::fs::{ChangeKind, Changeset};
use std::path::Path;

/// Sets the package's own version in manifest text.
///
/// Returns the new text, which equals the input when the version already
/// matched.
///
/// # Errors
///
/// - `MalformedManifest`: `content` is not valid TOML
/// - `MissingIdentitySection`: there is no `[package]` table
pub fn set_own_version(manifest_path: &Path, content: &str, new_version: &str) -> Result<String> {
    let mut manifest: Manifest = content
        .parse()
        .map_err(|source| ReleaseError::MalformedManifest {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    let previous = manifest.own_version().map(str::to_string);
    let changed = manifest
        .set_own_version(new_version)
        .map_err(|_| ReleaseError::MissingIdentitySection(manifest_path.to_path_buf()))?;

    if !changed {
        return Ok(content.to_string());
    }

    log::debug!(
        "{}: version {} → {}",
        manifest_path.display(),
        previous.as_deref().unwrap_or("<unset>"),
        new_version
    );

    Ok(manifest.to_string())
}

/// Updates the version in a registered crate's `Cargo.toml`.
///
/// This modifies the `[package]` section:
/// ```toml
/// [package]
/// name = "hetu-query"
/// version = "0.2.0"  # ← Updated
/// ```
///
/// # Guarantees
///
/// - Uses `toml_edit` to preserve formatting and comments
/// - Only modifies the `version` field
/// - Writes nothing when the version is already current
///
/// # Errors
///
/// - `MissingManifest`: manifest file does not exist
/// - `MalformedManifest`: manifest has invalid TOML syntax
/// - `MissingIdentitySection`: manifest has no `[package]` table
/// - `Io`: manifest cannot be read or written
///
/// # Examples
///
/// ```no_run
/// # use hetu_release::cargo::package::update_package_version;
/// # use hetu_release::fs::Changeset;
/// # use std::path::Path;
/// # fn example() -> hetu_release::error::Result<()> {
/// let mut changes = Changeset::new(false);
/// update_package_version(Path::new("core/query/Cargo.toml"), "0.2.0", &mut changes)?;
/// # Ok(())
/// # }
/// ```
pub fn update_package_version(
    manifest_path: &Path,
    new_version: &str,
    changes: &mut Changeset,
) -> Result<bool> {
    let content = changes
        .read(manifest_path)
        .map_err(|e| ReleaseError::manifest_read(manifest_path.to_path_buf(), e))?;

    let updated = set_own_version(manifest_path, &content, new_version)?;
    changes.write(manifest_path, &content, updated, ChangeKind::PackageVersion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_update_package_version() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");

        fs::write(
            &manifest,
            "[package]\nname = \"hetu-query\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        let mut changes = Changeset::new(false);
        assert!(update_package_version(&manifest, "0.2.0", &mut changes).unwrap());

        let result = fs::read_to_string(&manifest).unwrap();
        assert_eq!(
            result,
            "[package]\nname = \"hetu-query\"\nversion = \"0.2.0\"\n"
        );
    }

    #[test]
    fn test_preserves_comments() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");

        let input = r#"# Query engine
[package]
name = "hetu-query"
# Bumped by the release tool
version = "0.1.0"
edition = "2021"

[dependencies]
serde = { version = "1", features = ["derive"] } # external
"#;
        fs::write(&manifest, input).unwrap();

        let mut changes = Changeset::new(false);
        update_package_version(&manifest, "0.2.0", &mut changes).unwrap();

        let result = fs::read_to_string(&manifest).unwrap();
        assert_eq!(result, input.replace("version = \"0.1.0\"", "version = \"0.2.0\""));
    }

    #[test]
    fn test_idempotent() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");
        fs::write(&manifest, "[package]\nname = \"a\"\n").unwrap();

        let mut changes = Changeset::new(false);
        update_package_version(&manifest, "1.0.0", &mut changes).unwrap();
        let once = fs::read_to_string(&manifest).unwrap();

        assert!(!update_package_version(&manifest, "1.0.0", &mut changes).unwrap());
        let twice = fs::read_to_string(&manifest).unwrap();

        assert_eq!(once, twice);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("missing/Cargo.toml");

        let mut changes = Changeset::new(false);
        let err = update_package_version(&manifest, "1.0.0", &mut changes).unwrap_err();

        assert!(matches!(err, ReleaseError::MissingManifest(ref p) if p == &manifest));
    }

    #[test]
    fn test_malformed_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");
        fs::write(&manifest, "[package\nname = ").unwrap();

        let mut changes = Changeset::new(false);
        let err = update_package_version(&manifest, "1.0.0", &mut changes).unwrap_err();

        assert!(matches!(err, ReleaseError::MalformedManifest { ref path, .. } if path == &manifest));
        assert_eq!(fs::read_to_string(&manifest).unwrap(), "[package\nname = ");
    }

    #[test]
    fn test_missing_package_section() {
        let content = "[workspace]\nmembers = []\n";
        let err = set_own_version(Path::new("Cargo.toml"), content, "1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::MissingIdentitySection(_)));
    }
}
