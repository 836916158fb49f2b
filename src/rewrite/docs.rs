//! Version snippets in narrative documentation.
//!
//! Installation instructions carry lines such as:
//!
//! ```toml
//! [dependencies]
//! hetu = "0.1.0"
//! ```
//!
//! These are rewritten as plain text. The documentation is never parsed;
//! a regex finds `<token> = "<anything>"` and swaps the quoted part.
//!
//! ## Matching
//!
//! - The quoted segment is matched non-greedily and never crosses a line, so
//!   several snippets on different lines are replaced independently.
//! - The token must not be preceded by an identifier character, so
//!   `hetu-client = "..."` and `myhetu = "..."` are left alone.

use crate::error::{ReleaseError, Result};
use crate::fs::{ChangeKind, Changeset};
use regex::{Captures, Regex};
use std::path::Path;

/// Compiled pattern for one documentation token.
pub struct DocPattern {
    regex: Regex,
}

impl DocPattern {
    pub fn new(token: &str) -> Result<Self> {
        let pattern = format!(
            r#"(?m)(^|[^A-Za-z0-9_-])({} = ")(.*?)(")"#,
            regex::escape(token)
        );
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Replaces every snippet's version, returning the new text and the
    /// number of snippets found.
    pub fn rewrite(&self, content: &str, new_version: &str) -> (String, usize) {
        let mut count = 0;
        let rewritten = self.regex.replace_all(content, |caps: &Captures| {
            count += 1;
            format!("{}{}{}{}", &caps[1], &caps[2], new_version, &caps[4])
        });
        (rewritten.into_owned(), count)
    }
}

/// Rewrites documentation text. Pure.
pub fn rewrite_doc_version(content: &str, token: &str, new_version: &str) -> Result<(String, usize)> {
    Ok(DocPattern::new(token)?.rewrite(content, new_version))
}

/// Rewrites version snippets in a documentation file.
///
/// The file is only written when its text changed; zero matches, or
/// snippets already at `new_version`, leave it untouched on disk.
///
/// Returns the number of snippets found.
///
/// # Errors
///
/// - `MissingDocument`: the file does not exist
/// - `Io`: the file cannot be read or written
pub fn update_doc_file(
    doc_path: &Path,
    token: &str,
    new_version: &str,
    changes: &mut Changeset,
) -> Result<usize> {
    let content = changes.read(doc_path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReleaseError::MissingDocument(doc_path.to_path_buf())
        } else {
            ReleaseError::Io {
                path: doc_path.to_path_buf(),
                source,
            }
        }
    })?;

    let (updated, count) = rewrite_doc_version(&content, token, new_version)?;
    if count == 0 {
        log::warn!(
            "No `{} = \"...\"` snippets found in {}",
            token,
            doc_path.display()
        );
    }

    changes.write(doc_path, &content, updated, ChangeKind::Documentation)?;
    Ok(count)
}
