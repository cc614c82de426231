//! Recursive wildcard search

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::{Error, Result};

/// A compiled shell-style wildcard for matching base names.
///
/// `*` matches any run of characters within a path segment and `?` matches
/// exactly one character. Every other character is literal.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compile a wildcard pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the pattern is empty.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::invalid_input("pattern cannot be empty"));
        }

        let mut expr = String::with_capacity(pattern.len() * 2 + 2);
        expr.push('^');
        let mut literal = String::new();
        for ch in pattern.chars() {
            match ch {
                '*' | '?' => {
                    expr.push_str(&regex::escape(&literal));
                    literal.clear();
                    expr.push_str(if ch == '*' { "[^/]*" } else { "[^/]" });
                }
                _ => literal.push(ch),
            }
        }
        expr.push_str(&regex::escape(&literal));
        expr.push('$');

        let regex = Regex::new(&expr)
            .map_err(|e| Error::invalid_input(format!("invalid pattern {pattern:?}: {e}")))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Whether a base name satisfies the pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Find every non-directory entry below `root` whose base name matches `pattern`.
///
/// The walk recurses into all subdirectories without following symbolic
/// links. The root itself is never reported. Returned paths are absolute;
/// their order is unspecified.
///
/// # Errors
///
/// - `InvalidInput` if `root` or `pattern` is empty
/// - `Path` if `root` cannot be resolved or any part of the tree cannot be read
pub fn find_matching(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if root.as_os_str().is_empty() {
        return Err(Error::invalid_input("root path cannot be empty"));
    }
    let pattern = WildcardPattern::new(pattern)?;

    let root = dunce::canonicalize(root).map_err(|e| Error::walk(root, e))?;

    let mut matches = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&root).to_path_buf();
            Error::walk(path, e.into())
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        if pattern.matches(&entry.file_name().to_string_lossy()) {
            matches.push(entry.into_path());
        }
    }

    tracing::debug!(
        root = %root.display(),
        pattern = pattern.as_str(),
        count = matches.len(),
        "Wildcard search finished"
    );
    Ok(matches)
}
