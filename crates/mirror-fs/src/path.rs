//! Normalized path handling for authoritative list entries

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Authoritative list entries arrive as forward-slash strings regardless of
/// platform. This type keeps them in that form and converts to a native path
/// only when joined onto a filesystem root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and collapses repeated
    /// separators.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let replaced = path_str.replace('\\', "/");

        let mut inner = String::with_capacity(replaced.len());
        let mut previous_slash = false;
        for ch in replaced.chars() {
            if ch == '/' {
                if previous_slash {
                    continue;
                }
                previous_slash = true;
            } else {
                previous_slash = false;
            }
            inner.push(ch);
        }

        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the last path component, ignoring trailing slashes.
    ///
    /// This is the base-name used as an archive stem. Returns `None` for
    /// empty paths and for the bare root `/`.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// The path with any leading `/` removed, suitable for joining under a root.
    ///
    /// List entries such as `/movies/Alpha` are relative to the source root
    /// even when written with a leading slash.
    pub fn strip_root(&self) -> &str {
        self.inner.trim_start_matches('/')
    }

    /// Resolve this path under a native root directory.
    pub fn under(&self, root: &Path) -> PathBuf {
        let relative = self.strip_root().trim_end_matches('/');
        if relative.is_empty() {
            return root.to_path_buf();
        }
        relative
            .split('/')
            .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
