//! Error types for hetu-release.
//!
//! All operations return `Result<T>` which aliases `Result<T, ReleaseError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from version propagation and license aggregation.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Registry entry points at a manifest that does not exist.
    #[error("Manifest not found: {0}")]
    MissingManifest(PathBuf),

    /// Manifest content is not valid TOML.
    #[error("Malformed manifest {path}: {source}")]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    /// Manifest has no `[package]` table to hold a version.
    #[error("Manifest has no [package] section: {0}")]
    MissingIdentitySection(PathBuf),

    /// Reading or writing a file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Documentation target does not exist.
    #[error("Documentation file not found: {0}")]
    MissingDocument(PathBuf),

    /// Version string rejected before any file is touched.
    #[error("Invalid version '{0}': {1}")]
    InvalidVersion(String, String),

    /// Invalid package name in a registry.
    #[error("Invalid package name '{0}': {1}")]
    InvalidName(String, String),

    /// Registry file could not be understood.
    #[error("Invalid registry {path}: {reason}")]
    InvalidRegistry { path: PathBuf, reason: String },

    /// One or more registry entries failed while the run continued.
    #[error("{failed} manifest update(s) failed")]
    PropagationFailed { failed: usize },

    /// The external license inventory command failed.
    #[error("cargo-license failed: {0}")]
    LicenseTool(String),

    /// File system operation failed.
    #[error(transparent)]
    FileSystem(#[from] std::io::Error),

    /// TOML parse error outside of a registered manifest.
    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// License inventory is not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReleaseError {
    /// Maps a read failure on a registered manifest to the matching error kind.
    pub fn manifest_read(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReleaseError::MissingManifest(path)
        } else {
            ReleaseError::Io { path, source }
        }
    }
}

/// Result type alias for hetu-release operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;
