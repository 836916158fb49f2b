//! Subcommand orchestration.

pub mod bump;
pub mod license;
pub mod propagate;

pub use propagate::{DocTarget, FailurePolicy, Propagator, Report};
