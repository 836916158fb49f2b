//! Validation for release inputs.

pub mod rules;

pub use rules::{validate_manifest_path, validate_package_name, validate_version};
