//! Validation rules for versions, package names and registry paths.
//!
//! Pure functions with no I/O or side effects.

use crate::error::{ReleaseError, Result};
use std::path::{Component, Path};

const MAX_PACKAGE_NAME_LENGTH: usize = 64;

/// Validates a release version string.
///
/// No semantic-version parsing happens here. The string is written verbatim
/// into manifests and documentation, so only characters that would corrupt
/// a quoted TOML value or a single documentation line are rejected.
///
/// ## Rules
/// - Not empty
/// - No whitespace
/// - No `"`, `'` or `\`
/// - No control characters
pub fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(ReleaseError::InvalidVersion(
            version.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    for (idx, ch) in version.chars().enumerate() {
        if ch.is_whitespace() {
            return Err(ReleaseError::InvalidVersion(
                version.to_string(),
                format!("whitespace at position {}", idx),
            ));
        }

        if ch.is_control() || matches!(ch, '"' | '\'' | '\\') {
            return Err(ReleaseError::InvalidVersion(
                version.to_string(),
                format!("invalid character '{}' at position {}", ch.escape_default(), idx),
            ));
        }
    }

    Ok(())
}

/// Validates a registry package name against Cargo rules.
///
/// ## Rules
/// - 1-64 ASCII characters
/// - Starts with a letter or `_`
/// - Contains only `[a-zA-Z0-9_-]`
/// - Cannot end with `-`
pub fn validate_package_name(name: &str) -> Result<()> {
    let first = name.chars().next().ok_or_else(|| {
        ReleaseError::InvalidName(name.to_string(), "cannot be empty".to_string())
    })?;

    if name.len() > MAX_PACKAGE_NAME_LENGTH {
        return Err(ReleaseError::InvalidName(
            name.to_string(),
            format!(
                "exceeds {} chars (has {})",
                MAX_PACKAGE_NAME_LENGTH,
                name.len()
            ),
        ));
    }

    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(ReleaseError::InvalidName(
            name.to_string(),
            "must start with letter or underscore".to_string(),
        ));
    }

    for (idx, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '-' {
            return Err(ReleaseError::InvalidName(
                name.to_string(),
                format!("invalid character '{}' at position {}", ch, idx),
            ));
        }
    }

    if name.ends_with('-') {
        return Err(ReleaseError::InvalidName(
            name.to_string(),
            "cannot end with hyphen".to_string(),
        ));
    }

    if name.chars().any(|c| c.is_ascii_uppercase()) {
        log::warn!(
            "'{}' has uppercase (convention: lowercase-with-hyphens)",
            name
        );
    }

    Ok(())
}

/// Validates a manifest path taken from a registry file.
///
/// Registry paths are resolved against the repository root, so they must be
/// relative and must not climb out of it.
pub fn validate_manifest_path(path: &Path) -> std::result::Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err("path cannot be empty".to_string());
    }

    if path.is_absolute() || path.has_root() {
        return Err(format!(
            "'{}' must be relative to the repository root",
            path.display()
        ));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(format!(
            "'{}' cannot navigate outside the repository root",
            path.display()
        ));
    }

    Ok(())
}
