//! The registry of internally-owned packages.
//!
//! A [`Registry`] maps logical package names to manifest locations relative
//! to a repository root. It decides which dependency declarations are
//! rewritten during a bump: a name present here is internal, anything else
//! is an external dependency and is never touched.
//!
//! Registries are plain values. Build one explicitly with [`Registry::new`],
//! take the built-in HetuDB table with [`Registry::builtin`], or load a
//! registry file with [`RegistryFile::load`].
//!
//! ```toml
//! doc-token = "hetu"
//! docs = "README.md"
//!
//! [packages]
//! hetu-query = "core/query/Cargo.toml"
//! hetu-datanode = "storage/datanode"
//! ```

use crate::error::{ReleaseError, Result};
use crate::verify::{validate_manifest_path, validate_package_name};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// Token used in documentation snippets such as `hetu = "0.1.0"`.
pub const DEFAULT_DOC_TOKEN: &str = "hetu";

/// Documentation file rewritten by default.
pub const DEFAULT_DOCS: &str = "README.md";

const MANIFEST_FILE: &str = "Cargo.toml";

const HETU_PACKAGES: &[(&str, &str)] = &[
    // core
    ("hetu-cloud-service", "core/cloudsrv/Cargo.toml"),
    ("hetu-query", "core/query/Cargo.toml"),
    ("hetu-metabase", "core/metabase/Cargo.toml"),
    ("hetu-core", "core/core/Cargo.toml"),
    // common
    ("hetu-error", "common/error/Cargo.toml"),
    // cli
    ("hetu-client", "client/rust/client/Cargo.toml"),
    ("hetu-cli", "client/rust/cli/Cargo.toml"),
    // benchmarks
    ("hetu-benchmarks", "benchmarks/Cargo.toml"),
    // examples
    ("hetu-examples", "examples/Cargo.toml"),
    // lib
    ("hetu-mywire", "lib/mywire/Cargo.toml"),
    ("hetu-cstore", "lib/cstore/Cargo.toml"),
    ("hetu-lstore", "lib/lstore/Cargo.toml"),
    // extension
    ("hetu-cdc", "extension/cdc/Cargo.toml"),
    ("hetu-streaming", "extension/streaming/Cargo.toml"),
    // plugin
    ("hetu-tpch", "plugin/tpch/Cargo.toml"),
    ("hetu-tpcds", "plugin/tpcds/Cargo.toml"),
    // service
    ("hetu-proxy", "plugin/proxy/Cargo.toml"),
    // testing
    ("hetu-benchmark", "testing/benchmark/Cargo.toml"),
    // storage
    ("hetu-datanode", "storage/datanode"),
];

/// Immutable table of internal packages and their manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    root: PathBuf,
    packages: BTreeMap<String, PathBuf>,
}

/// A registry entry with its manifest path resolved against the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub name: &'a str,
    pub manifest_path: PathBuf,
}

impl Registry {
    /// Creates a registry from `(name, manifest path)` pairs.
    ///
    /// Paths are kept as given and resolved against `root` on iteration.
    pub fn new<I, N, P>(root: impl Into<PathBuf>, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            root: root.into(),
            packages: entries
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }

    /// The HetuDB package table.
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self::new(root, HETU_PACKAGES.iter().copied())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns true if `name` is an internally-owned package.
    pub fn is_internal(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Resolved manifest path for a registered package.
    pub fn manifest_path(&self, name: &str) -> Option<PathBuf> {
        self.packages.get(name).map(|path| self.resolve(path))
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = Entry<'_>> {
        self.packages.iter().map(|(name, path)| Entry {
            name: name.as_str(),
            manifest_path: self.resolve(path),
        })
    }

    /// Joins `path` onto the root. A directory stands for the `Cargo.toml`
    /// inside it.
    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = self.root.join(path);
        if joined.is_dir() {
            joined.join(MANIFEST_FILE)
        } else {
            joined
        }
    }
}

/// Contents of a registry file.
#[derive(Debug, Clone)]
pub struct RegistryFile {
    pub registry: Registry,
    pub docs: Option<PathBuf>,
    pub doc_token: Option<String>,
}

impl RegistryFile {
    /// Loads a registry file, resolving package paths against `root`.
    pub fn load(path: &Path, root: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ReleaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, root).map_err(|reason| ReleaseError::InvalidRegistry {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses registry file content.
    ///
    /// Errors are returned as plain reasons; [`RegistryFile::load`] attaches
    /// the file path.
    pub fn parse(content: &str, root: &Path) -> std::result::Result<Self, String> {
        let doc: DocumentMut = content.parse().map_err(|e| format!("{}", e))?;

        let packages = doc
            .get("packages")
            .and_then(|item| item.as_table_like())
            .ok_or_else(|| "missing [packages] table".to_string())?;

        let mut entries = Vec::new();
        for (name, item) in packages.iter() {
            validate_package_name(name).map_err(|e| e.to_string())?;

            let path = item
                .as_str()
                .ok_or_else(|| format!("path for '{}' must be a string", name))?;
            validate_manifest_path(Path::new(path))?;

            entries.push((name.to_string(), PathBuf::from(path)));
        }

        if entries.is_empty() {
            return Err("[packages] table is empty".to_string());
        }

        let docs = match doc.get("docs") {
            Some(item) => Some(PathBuf::from(
                item.as_str()
                    .ok_or_else(|| "'docs' must be a string".to_string())?,
            )),
            None => None,
        };

        let doc_token = match doc.get("doc-token") {
            Some(item) => Some(
                item.as_str()
                    .filter(|token| !token.is_empty())
                    .ok_or_else(|| "'doc-token' must be a non-empty string".to_string())?
                    .to_string(),
            ),
            None => None,
        };

        log::debug!("Loaded registry with {} package(s)", entries.len());

        Ok(Self {
            registry: Registry::new(root, entries),
            docs,
            doc_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_membership() {
        let registry = Registry::new("/repo", [("a", "a/Cargo.toml"), ("b", "b/Cargo.toml")]);

        assert!(registry.is_internal("a"));
        assert!(registry.is_internal("b"));
        assert!(!registry.is_internal("serde"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_builtin_table() {
        let registry = Registry::builtin("/repo");

        assert_eq!(registry.len(), HETU_PACKAGES.len());
        assert!(registry.is_internal("hetu-query"));
        assert!(registry.is_internal("hetu-datanode"));
        assert_eq!(
            registry.manifest_path("hetu-error"),
            Some(PathBuf::from("/repo/common/error/Cargo.toml"))
        );
    }

    #[test]
    fn test_directory_resolves_to_manifest() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("storage/datanode")).unwrap();

        let registry = Registry::new(temp.path(), [("hetu-datanode", "storage/datanode")]);
        let entry = registry.iter().next().unwrap();

        assert_eq!(entry.name, "hetu-datanode");
        assert_eq!(
            entry.manifest_path,
            temp.path().join("storage/datanode/Cargo.toml")
        );
    }

    #[test]
    fn test_missing_path_is_not_checked_eagerly() {
        let registry = Registry::new("/does/not/exist", [("ghost", "ghost/Cargo.toml")]);
        assert_eq!(
            registry.manifest_path("ghost"),
            Some(PathBuf::from("/does/not/exist/ghost/Cargo.toml"))
        );
    }

    #[test]
    fn test_parse_registry_file() {
        let content = r#"
doc-token = "mydb"
docs = "docs/install.md"

[packages]
mydb-core = "core/Cargo.toml"
mydb-cli = "cli"
"#;
        let file = RegistryFile::parse(content, Path::new("/repo")).unwrap();

        assert_eq!(file.registry.len(), 2);
        assert!(file.registry.is_internal("mydb-cli"));
        assert_eq!(file.docs, Some(PathBuf::from("docs/install.md")));
        assert_eq!(file.doc_token.as_deref(), Some("mydb"));
    }

    #[test]
    fn test_parse_registry_file_defaults() {
        let file = RegistryFile::parse("[packages]\na = \"a/Cargo.toml\"\n", Path::new(".")).unwrap();
        assert_eq!(file.docs, None);
        assert_eq!(file.doc_token, None);
    }

    #[test]
    fn test_parse_registry_file_errors() {
        let root = Path::new("/repo");
        assert!(RegistryFile::parse("docs = \"README.md\"\n", root).is_err());
        assert!(RegistryFile::parse("[packages]\n", root).is_err());
        assert!(RegistryFile::parse("[packages]\na = 1\n", root).is_err());
        assert!(RegistryFile::parse("[packages]\n\"bad name\" = \"x\"\n", root).is_err());
        assert!(RegistryFile::parse("[packages]\na = \"../a\"\n", root).is_err());
        assert!(RegistryFile::parse("[packages\n", root).is_err());
    }

    #[test]
    fn test_load_attaches_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("release.toml");
        fs::write(&file, "[packages]\n").unwrap();

        let err = RegistryFile::load(&file, temp.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidRegistry { ref path, .. } if path == &file));
    }
}
