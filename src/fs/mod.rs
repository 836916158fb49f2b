//! File system access for release runs.
//!
//! Reads and writes go through a change set that supports dry runs and
//! records what was modified.

pub mod changeset;

pub use changeset::{Change, ChangeKind, Changeset};
