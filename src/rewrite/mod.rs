//! Plain-text rewriting of files that are not manifests.

pub mod docs;

pub use docs::{DocPattern, rewrite_doc_version, update_doc_file};
