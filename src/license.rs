//! Third-party license attribution.
//!
//! Turns the dependency inventory reported by `cargo license --json` into a
//! single attribution document: a fixed license preamble followed by one
//! block per dependency, in inventory order.

use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

const PREAMBLE: &str = r#"
  Copyright 2021 HetuDB.

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License
"#;

const SEPARATOR: &str = "------------------\n\n";

/// One third-party crate as reported by cargo-license.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Parses a cargo-license JSON inventory.
pub fn parse_inventory(json: &str) -> Result<Vec<LicenseEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Runs cargo-license and parses its inventory.
///
/// Build and dev dependencies are excluded.
pub fn collect_inventory(manifest_path: Option<&Path>) -> Result<Vec<LicenseEntry>> {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "license",
        "--avoid-build-deps",
        "--avoid-dev-deps",
        "--do-not-bundle",
        "--json",
    ]);
    if let Some(path) = manifest_path {
        cmd.arg("--manifest-path").arg(path);
    }

    log::debug!("Running {:?}", cmd);

    let output = cmd.output().map_err(|e| {
        ReleaseError::LicenseTool(format!(
            "could not run `cargo license` ({}). Install it with `cargo install cargo-license`",
            e
        ))
    })?;

    if !output.status.success() {
        return Err(ReleaseError::LicenseTool(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    parse_inventory(&String::from_utf8_lossy(&output.stdout))
}

/// Renders the attribution document.
pub fn render_attribution(entries: &[LicenseEntry]) -> String {
    let mut result = String::from(PREAMBLE);
    result.push('\n');
    result.push_str(SEPARATOR);
    result.push_str("This software is built and contains the following software:\n\n");
    result.push_str(
        "(automatically generated via [cargo-license](https://crates.io/crates/cargo-license))\n\n",
    );

    for entry in entries {
        result.push_str(SEPARATOR);
        result.push_str(&format!("### {} {}\n", entry.name, entry.version));
        match &entry.repository {
            Some(repo) => result.push_str(&format!("* source: [{}]({})\n", repo, repo)),
            None => result.push_str("* source: unknown\n"),
        }
        result.push_str(&format!(
            "* license: {}\n\n",
            entry.license.as_deref().unwrap_or("unknown")
        ));
    }

    result
}
