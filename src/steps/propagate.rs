//! The three-pass version propagation.
//!
//! 1. Set every registered package's own version.
//! 2. Scan every registered manifest as a consumer and retarget version pins
//!    on registered packages.
//! 3. Rewrite version snippets in documentation.
//!
//! Each manifest is read, edited in memory, and written back before the next
//! one is touched. A failed entry is reported with its path; under
//! [`FailurePolicy::Continue`] the run goes on and skips that entry in later
//! passes, under [`FailurePolicy::Abort`] the run stops. Nothing already
//! written is undone.

use crate::cargo::{update_dependent_manifest, update_package_version};
use crate::error::{ReleaseError, Result};
use crate::fs::Changeset;
use crate::registry::Registry;
use crate::rewrite::update_doc_file;

use colored::Colorize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// What to do when a registry entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and keep going with the remaining entries.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// Documentation target of the third pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTarget {
    pub path: PathBuf,
    pub token: String,
}

/// A failed file, with the error that stopped it.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: ReleaseError,
}

/// Outcome of a run under [`FailurePolicy::Continue`].
#[derive(Debug, Default)]
pub struct Report {
    pub packages_updated: usize,
    pub dependencies_updated: usize,
    pub doc_snippets: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies one version across a registry.
pub struct Propagator<'a> {
    registry: &'a Registry,
    new_version: &'a str,
    policy: FailurePolicy,
}

impl<'a> Propagator<'a> {
    pub fn new(registry: &'a Registry, new_version: &'a str) -> Self {
        Self {
            registry,
            new_version,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs all passes.
    ///
    /// Returns `Err` only under [`FailurePolicy::Abort`]; otherwise failures
    /// are collected in the report.
    pub fn run(&self, docs: Option<&DocTarget>, changes: &mut Changeset) -> Result<Report> {
        let mut report = Report::default();
        let mut failed = BTreeSet::new();

        self.own_version_pass(changes, &mut report, &mut failed)?;
        self.cross_reference_pass(changes, &mut report, &mut failed)?;

        if let Some(doc) = docs {
            self.documentation_pass(doc, changes, &mut report)?;
        }

        Ok(report)
    }

    fn own_version_pass(
        &self,
        changes: &mut Changeset,
        report: &mut Report,
        failed: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        for entry in self.registry.iter() {
            status("Updating", &format!("{} to {}", entry.name, self.new_version));

            match update_package_version(&entry.manifest_path, self.new_version, changes) {
                Ok(true) => report.packages_updated += 1,
                Ok(false) => log::debug!("{} already at {}", entry.name, self.new_version),
                Err(error) => {
                    failed.insert(entry.manifest_path.clone());
                    self.fail(report, entry.manifest_path, error)?;
                }
            }
        }
        Ok(())
    }

    fn cross_reference_pass(
        &self,
        changes: &mut Changeset,
        report: &mut Report,
        failed: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        for entry in self.registry.iter() {
            if failed.contains(&entry.manifest_path) {
                log::debug!("Skipping {}: failed earlier", entry.manifest_path.display());
                continue;
            }

            let result = update_dependent_manifest(
                &entry.manifest_path,
                self.registry,
                self.new_version,
                changes,
            );

            match result {
                Ok(updates) => {
                    for update in &updates {
                        status(
                            "Updating",
                            &format!("{} dependency in {}", update.package, entry.name),
                        );
                    }
                    report.dependencies_updated += updates.len();
                }
                Err(error) => {
                    failed.insert(entry.manifest_path.clone());
                    self.fail(report, entry.manifest_path, error)?;
                }
            }
        }
        Ok(())
    }

    fn documentation_pass(
        &self,
        doc: &DocTarget,
        changes: &mut Changeset,
        report: &mut Report,
    ) -> Result<()> {
        status("Updating", &format!("docs in {}", doc.path.display()));

        match update_doc_file(&doc.path, &doc.token, self.new_version, changes) {
            Ok(count) => report.doc_snippets += count,
            Err(error) => self.fail(report, doc.path.clone(), error)?,
        }
        Ok(())
    }

    /// Reports a failure, then either records it or aborts.
    fn fail(&self, report: &mut Report, path: PathBuf, error: ReleaseError) -> Result<()> {
        match self.policy {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::Continue => {
                eprintln!("{} {}", "Error:".red().bold(), error);
                report.failures.push(Failure { path, error });
                Ok(())
            }
        }
    }
}

fn status(verb: &str, message: &str) {
    println!("{:>12} {}", verb.green().bold(), message);
}

/// Paths of failed files, for display.
pub fn failed_paths(report: &Report) -> Vec<&Path> {
    report.failures.iter().map(|f| f.path.as_path()).collect()
}
