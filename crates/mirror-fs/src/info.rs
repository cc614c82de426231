//! Entry metadata lookup

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{Error, NormalizedPath, Result};

/// Metadata of an existing source entry or archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Path that was probed
    pub path: PathBuf,
    /// Size in bytes as reported by the filesystem
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Look up `root/name` or `root/name.extension`.
///
/// `name` may be a relative path with forward slashes. An empty `extension`
/// probes `root/name` as-is. Symbolic links are followed.
///
/// Returns `Ok(None)` when the entry does not exist. A path component that
/// exists but is not a directory also means the entry does not exist.
///
/// # Errors
///
/// - `InvalidInput` if `root` or `name` is empty
/// - `Access` for permission or I/O failures other than non-existence
pub fn get_entry_info(root: &Path, name: &str, extension: &str) -> Result<Option<EntryInfo>> {
    if root.as_os_str().is_empty() {
        return Err(Error::invalid_input("root path cannot be empty"));
    }
    if name.is_empty() {
        return Err(Error::invalid_input("name cannot be empty"));
    }

    let candidate = if extension.is_empty() {
        NormalizedPath::new(name)
    } else {
        NormalizedPath::new(format!("{name}.{extension}"))
    };
    let path = candidate.under(root);

    match fs::metadata(&path) {
        Ok(meta) => {
            let modified = meta.modified().map_err(|e| Error::access(&path, e))?;
            Ok(Some(EntryInfo {
                size: meta.len(),
                modified,
                is_dir: meta.is_dir(),
                path,
            }))
        }
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(Error::access(path, e)),
    }
}
