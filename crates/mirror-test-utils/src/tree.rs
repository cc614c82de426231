//! [`MediaTree`] builder for sync scenarios.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use crate::archive;

/// A temporary directory holding a `source/` media root and a `target/`
/// archive root, with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::MediaTree;
///
/// let tree = MediaTree::new();
/// tree.add_movie("movies/Alpha");
/// tree.add_archive("Orphan");
/// tree.assert_archive_exists("Orphan");
/// ```
pub struct MediaTree {
    // Removes the directory on drop
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for MediaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTree {
    /// Create empty `source/` and `target/` directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        // Walk results are canonical, so the fixture paths must be too
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        fs::create_dir(root.join("source")).unwrap();
        fs::create_dir(root.join("target")).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the canonical root path of the temporary directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("source")
    }

    pub fn target(&self) -> PathBuf {
        self.root().join("target")
    }

    /// Create a file under the source root, creating parents as needed.
    pub fn add_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.source().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a movie directory holding a single `movie.mkv`.
    pub fn add_movie(&self, relative: &str) -> PathBuf {
        let dir = self.source().join(relative);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("movie.mkv"), format!("frames of {relative}")).unwrap();
        dir
    }

    /// Path of `target/<base>.tar.gz`.
    pub fn archive_path(&self, base: &str) -> PathBuf {
        self.target().join(format!("{base}.tar.gz"))
    }

    /// Write a placeholder archive for `base` into the target root.
    pub fn add_archive(&self, base: &str) -> PathBuf {
        let path = self.archive_path(base);
        fs::write(&path, format!("placeholder for {base}")).unwrap();
        path
    }

    /// Set the modification time of a file or directory.
    ///
    /// # Panics
    /// Panics if the path cannot be opened or its times cannot be set.
    pub fn set_modified(&self, path: &Path, time: SystemTime) {
        let file = File::open(path)
            .unwrap_or_else(|e| panic!("set_modified: cannot open {}: {e}", path.display()));
        file.set_modified(time)
            .unwrap_or_else(|e| panic!("set_modified: failed for {}: {e}", path.display()));
    }

    /// Move the modification time of `path` `secs` seconds into the past.
    pub fn age(&self, path: &Path, secs: u64) {
        let time = SystemTime::now() - Duration::from_secs(secs);
        self.set_modified(path, time);
    }

    pub fn modified(&self, path: &Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    /// Sorted base-names of the archives directly under the target root.
    pub fn archive_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.target())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter_map(|name| name.strip_suffix(".tar.gz").map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Name, mtime and size of everything directly under the target root.
    pub fn target_snapshot(&self) -> BTreeMap<String, (SystemTime, u64)> {
        fs::read_dir(self.target())
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                let meta = e.metadata().unwrap();
                (
                    e.file_name().to_string_lossy().into_owned(),
                    (meta.modified().unwrap(), meta.len()),
                )
            })
            .collect()
    }

    /// Entry names stored in `target/<base>.tar.gz`.
    pub fn archive_entries(&self, base: &str) -> Vec<String> {
        archive::entry_names(&self.archive_path(base))
    }

    /// Assert that `target/<base>.tar.gz` exists and is non-empty.
    ///
    /// # Panics
    /// Panics with a descriptive message otherwise.
    pub fn assert_archive_exists(&self, base: &str) {
        let path = self.archive_path(base);
        let len = fs::metadata(&path)
            .unwrap_or_else(|_| panic!("Expected archive to exist: {}", path.display()))
            .len();
        assert!(len > 0, "Expected archive to be non-empty: {}", path.display());
    }

    /// Assert that `target/<base>.tar.gz` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the archive exists.
    pub fn assert_no_archive(&self, base: &str) {
        let path = self.archive_path(base);
        assert!(
            !path.exists(),
            "Expected archive NOT to exist: {}",
            path.display()
        );
    }
}
