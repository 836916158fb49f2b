//! Cargo manifest manipulation.
//!
//! This module provides the manifest edits a release performs. It is split
//! into three concerns:
//!
//! - **`manifest`**: Format-preserving typed access to a `Cargo.toml`
//! - **`package`**: Updates to a registered crate's own version
//! - **`dependency`**: Updates to version pins on registered crates
//!
//! All edits go through `toml_edit` so formatting, comments, and key order
//! survive.

pub mod dependency;
pub mod manifest;
pub mod package;

pub use dependency::{DependencyUpdate, retarget_dependents, update_dependent_manifest};
pub use manifest::{DependencyScope, DependencyTable, Manifest};
pub use package::{set_own_version, update_package_version};
