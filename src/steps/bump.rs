//! Orchestration for the `bump` subcommand.

use crate::error::{ReleaseError, Result};
use crate::fs::Changeset;
use crate::registry::{DEFAULT_DOC_TOKEN, DEFAULT_DOCS, Registry, RegistryFile};
use crate::steps::propagate::{DocTarget, FailurePolicy, Propagator, failed_paths};
use crate::verify::validate_version;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

/// Arguments for the `bump` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct BumpArgs {
    /// Version to set on every registered package
    pub new_version: String,

    /// Repository root that registry paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Load the package registry from a TOML file instead of the built-in table
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Documentation file whose `hetu = "..."` snippets are rewritten
    #[arg(long, value_name = "FILE", conflicts_with = "skip_docs")]
    pub docs: Option<PathBuf>,

    /// Do not touch documentation
    #[arg(long)]
    pub skip_docs: bool,

    /// Preview changes without applying them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Stop at the first manifest error instead of continuing
    #[arg(long)]
    pub fail_fast: bool,
}

impl BumpArgs {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        }
    }
}

/// Settings resolved from arguments and an optional registry file.
#[derive(Debug, Clone)]
pub struct BumpPlan {
    pub registry: Registry,
    pub docs: Option<DocTarget>,
}

impl BumpPlan {
    /// Resolves the registry and documentation target.
    ///
    /// Command-line flags win over registry file settings.
    pub fn resolve(args: &BumpArgs) -> Result<Self> {
        if !args.root.is_dir() {
            return Err(ReleaseError::Other(anyhow::anyhow!(
                "Repository root is not a directory: {}",
                args.root.display()
            )));
        }

        let (registry, file_docs, file_token) = match &args.registry {
            Some(path) => {
                let file = RegistryFile::load(path, &args.root)?;
                (file.registry, file.docs, file.doc_token)
            }
            None => (Registry::builtin(&args.root), None, None),
        };

        let docs = if args.skip_docs {
            None
        } else {
            let path = args
                .docs
                .clone()
                .or(file_docs)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS));
            Some(DocTarget {
                path: args.root.join(path),
                token: file_token.unwrap_or_else(|| DEFAULT_DOC_TOKEN.to_string()),
            })
        };

        Ok(Self { registry, docs })
    }
}

/// Executes a version bump.
///
/// ## Phases
///
/// 1. Validate the version string
/// 2. Resolve registry and documentation target
/// 3. Propagate: own versions, dependency pins, documentation
/// 4. Print summary
///
/// Returns `PropagationFailed` if any entry failed under the continue policy.
pub fn execute(args: BumpArgs) -> Result<()> {
    validate_version(&args.new_version)?;

    let plan = BumpPlan::resolve(&args)?;
    log::debug!(
        "Bumping {} package(s) under {}",
        plan.registry.len(),
        plan.registry.root().display()
    );

    println!(
        "{:>12} {} crate versions in {} to {}",
        "Bumping".cyan().bold(),
        plan.registry.len(),
        args.root.display(),
        args.new_version.green().bold()
    );

    let mut changes = Changeset::new(args.dry_run);
    let report = Propagator::new(&plan.registry, &args.new_version)
        .with_policy(args.failure_policy())
        .run(plan.docs.as_ref(), &mut changes)?;

    changes.print_summary(&args.root);

    if !report.is_success() {
        eprintln!("\n{}", "Failed:".red().bold());
        for path in failed_paths(&report) {
            eprintln!("   {} {}", "✗".red(), path.display());
        }
        return Err(ReleaseError::PropagationFailed {
            failed: report.failures.len(),
        });
    }

    if !args.dry_run {
        println!(
            "\n{} {}",
            "✓ Released version".green().bold(),
            args.new_version.green().bold()
        );
    }

    Ok(())
}
