//! Collaborators that supply the authoritative path list

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A source of relative paths that should exist as archives.
///
/// Errors returned here abort a run before the engine touches the
/// filesystem.
pub trait PathSource {
    fn list_paths(&self) -> Result<Vec<String>>;
}

impl<T: AsRef<str>> PathSource for [T] {
    fn list_paths(&self) -> Result<Vec<String>> {
        Ok(self.iter().map(|p| p.as_ref().to_string()).collect())
    }
}

impl<T: AsRef<str>> PathSource for Vec<T> {
    fn list_paths(&self) -> Result<Vec<String>> {
        self.as_slice().list_paths()
    }
}

/// A newline-delimited list file.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with
/// `#` are ignored.
#[derive(Debug, Clone)]
pub struct ListFile {
    path: PathBuf,
}

impl ListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse list file content.
    pub fn parse(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

impl PathSource for ListFile {
    fn list_paths(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| Error::PathSource {
            origin: self.path.display().to_string(),
            source: Box::new(e),
        })?;
        let paths = Self::parse(&content);
        tracing::debug!(list = %self.path.display(), count = paths.len(), "Loaded path list");
        Ok(paths)
    }
}
