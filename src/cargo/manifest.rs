//! Typed access to the parts of a `Cargo.toml` a version bump touches.
//!
//! [`Manifest`] keeps the parsed `toml_edit` document private and exposes
//! only version reads and writes on the `[package]` table and on dependency
//! declarations. Everything else in the file round-trips untouched.
//!
//! # Dependency tables
//!
//! ```toml
//! [dependencies]
//! hetu-error = { path = "../error", version = "0.1.0" }
//!
//! [dev-dependencies.hetu-query]
//! version = "0.1.0"
//!
//! [target.'cfg(unix)'.build-dependencies]
//! hetu-mywire = "0.1.0"
//! ```

use std::fmt;
use std::str::FromStr;
use toml_edit::{DocumentMut, Item, Value};

/// Kind of dependency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyScope {
    Normal,
    Dev,
    Build,
}

impl DependencyScope {
    pub const ALL: [DependencyScope; 3] = [
        DependencyScope::Normal,
        DependencyScope::Dev,
        DependencyScope::Build,
    ];

    /// Table key in the manifest.
    pub fn key(self) -> &'static str {
        match self {
            DependencyScope::Normal => "dependencies",
            DependencyScope::Dev => "dev-dependencies",
            DependencyScope::Build => "build-dependencies",
        }
    }
}

/// Location of one dependency table, e.g. `[target.'cfg(unix)'.dependencies]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyTable {
    pub target: Option<String>,
    pub scope: DependencyScope,
}

impl DependencyTable {
    pub fn new(scope: DependencyScope) -> Self {
        Self {
            target: None,
            scope,
        }
    }

    pub fn for_target(target: impl Into<String>, scope: DependencyScope) -> Self {
        Self {
            target: Some(target.into()),
            scope,
        }
    }
}

impl fmt::Display for DependencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "target.{}.{}", target, self.scope.key()),
            None => f.write_str(self.scope.key()),
        }
    }
}

/// A declaration inside a dependency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Key in the table (may be an alias).
    pub key: String,
    /// Package the key refers to: the `package` field if present, else the key.
    pub package: String,
}

/// Returned when the manifest has no `[package]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingPackageTable;

/// A parsed manifest that preserves formatting on write.
#[derive(Debug, Clone)]
pub struct Manifest {
    doc: DocumentMut,
}

impl FromStr for Manifest {
    type Err = toml_edit::TomlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { doc: s.parse()? })
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}

impl Manifest {
    /// `[package].version` when it is a plain string.
    pub fn own_version(&self) -> Option<&str> {
        self.doc.get("package")?.get("version")?.as_str()
    }

    /// Sets `[package].version`, inserting the key when absent.
    ///
    /// Returns `Ok(false)` if the version already matched.
    pub fn set_own_version(&mut self, version: &str) -> Result<bool, MissingPackageTable> {
        if self.own_version() == Some(version) {
            return Ok(false);
        }

        let package = self
            .doc
            .get_mut("package")
            .and_then(Item::as_table_like_mut)
            .ok_or(MissingPackageTable)?;

        match package.get_mut("version") {
            Some(slot) => replace_string(slot, version),
            None => {
                package.insert("version", toml_edit::value(version));
            }
        }

        Ok(true)
    }

    /// Dependency tables present in the manifest, top-level first.
    pub fn dependency_tables(&self) -> Vec<DependencyTable> {
        let mut tables: Vec<_> = DependencyScope::ALL
            .into_iter()
            .filter(|scope| self.doc.get(scope.key()).is_some_and(Item::is_table_like))
            .map(DependencyTable::new)
            .collect();

        if let Some(targets) = self.doc.get("target").and_then(Item::as_table_like) {
            for (target, item) in targets.iter() {
                for scope in DependencyScope::ALL {
                    if item.get(scope.key()).is_some_and(Item::is_table_like) {
                        tables.push(DependencyTable::for_target(target, scope));
                    }
                }
            }
        }

        tables
    }

    /// Declarations in one dependency table, in file order.
    pub fn dependencies(&self, table: &DependencyTable) -> Vec<Declaration> {
        let Some(deps) = self.table(table).and_then(Item::as_table_like) else {
            return Vec::new();
        };

        deps.iter()
            .map(|(key, item)| Declaration {
                key: key.to_string(),
                package: item
                    .get("package")
                    .and_then(Item::as_str)
                    .unwrap_or(key)
                    .to_string(),
            })
            .collect()
    }

    /// Version of a declaration. A bare string declaration is its own version.
    pub fn dependency_version(&self, table: &DependencyTable, key: &str) -> Option<&str> {
        let dep = self.table(table)?.get(key)?;
        dep.as_str().or_else(|| dep.get("version")?.as_str())
    }

    /// Returns true if the declaration carries a version field of any shape.
    pub fn has_dependency_version(&self, table: &DependencyTable, key: &str) -> bool {
        self.table(table)
            .and_then(|deps| deps.get(key))
            .is_some_and(|dep| dep.is_str() || dep.get("version").is_some())
    }

    /// Returns true if the declaration points at a git source without a version.
    pub fn is_pin_only(&self, table: &DependencyTable, key: &str) -> bool {
        self.table(table)
            .and_then(|deps| deps.get(key))
            .is_some_and(|dep| dep.get("git").is_some() && dep.get("version").is_none())
    }

    /// Sets the version of an existing declaration that already has one.
    ///
    /// Declarations without a version field are left alone. Returns true if
    /// the document changed.
    pub fn set_dependency_version(
        &mut self,
        table: &DependencyTable,
        key: &str,
        version: &str,
    ) -> bool {
        if !self.has_dependency_version(table, key)
            || self.dependency_version(table, key) == Some(version)
        {
            return false;
        }

        let Some(dep) = self.table_mut(table).and_then(|deps| deps.get_mut(key)) else {
            return false;
        };

        if dep.is_str() {
            replace_string(dep, version);
            return true;
        }

        match dep.get_mut("version") {
            Some(slot) => {
                replace_string(slot, version);
                true
            }
            None => false,
        }
    }

    fn table(&self, table: &DependencyTable) -> Option<&Item> {
        match &table.target {
            None => self.doc.get(table.scope.key()),
            Some(target) => self
                .doc
                .get("target")?
                .get(target.as_str())?
                .get(table.scope.key()),
        }
    }

    fn table_mut(&mut self, table: &DependencyTable) -> Option<&mut Item> {
        match &table.target {
            None => self.doc.get_mut(table.scope.key()),
            Some(target) => self
                .doc
                .get_mut("target")?
                .get_mut(target.as_str())?
                .get_mut(table.scope.key()),
        }
    }
}

/// Replaces a value with a string, keeping the whitespace and comment around it.
fn replace_string(slot: &mut Item, new: &str) {
    match slot.as_value_mut() {
        Some(existing) => {
            let decor = existing.decor().clone();
            *existing = Value::from(new);
            *existing.decor_mut() = decor;
        }
        None => *slot = toml_edit::value(new),
    }
}
