//! SyncEngine implementation
//!
//! A run moves through three phases in strict order. Each phase completes
//! before the next starts and the first unrecoverable error aborts the run,
//! tagged with the phase it happened in:
//!
//! 1. **cleanup**: delete archives whose base-name is no longer listed
//! 2. **diff**: mark listed entries whose archive is missing or older than the source
//! 3. **compress**: write an archive for every marked entry, stopping at the first failure
//!
//! Cleanup must finish before compression starts: an archive written in the
//! compress phase may reuse a name that cleanup just freed.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mirror_fs::{
    ARCHIVE_EXTENSION, CompressOptions, NormalizedPath, archive_name, archive_pattern,
    archive_stem, compress, find_matching, get_entry_info,
};

use crate::source::PathSource;
use crate::{Error, Phase, Result};

use super::plan::{ArchiveReason, PlannedEntry, SyncPlan};
use super::report::{ArchivedEntry, SyncReport};

/// Options for sync runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Options passed to every compression
    pub compress: CompressOptions,
    /// If true, record what would be removed and archived without touching
    /// the filesystem.
    pub dry_run: bool,
}

/// A validated list entry.
#[derive(Debug, Clone)]
struct Entry {
    path: NormalizedPath,
    base_name: String,
}

/// Engine that keeps `target_root` in line with `source_root`.
///
/// The engine holds no state between runs; every [`run`](Self::run) is an
/// independent pass over the filesystem.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    source_root: PathBuf,
    target_root: PathBuf,
    options: SyncOptions,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either root is empty.
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        options: SyncOptions,
    ) -> Result<Self> {
        let source_root = source_root.into();
        let target_root = target_root.into();

        if source_root.as_os_str().is_empty() {
            return Err(Error::invalid_input("source root cannot be empty"));
        }
        if target_root.as_os_str().is_empty() {
            return Err(Error::invalid_input("target root cannot be empty"));
        }

        Ok(Self {
            source_root,
            target_root,
            options,
        })
    }

    /// Synchronize the target root with the authoritative path list.
    ///
    /// An empty list succeeds immediately without touching the filesystem.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if an entry has no usable base-name or two distinct
    ///   entries share one; nothing is modified in that case
    /// - `Phase` wrapping the first filesystem failure, tagged `cleanup`,
    ///   `diff` or `compress`
    pub fn run<S: AsRef<str>>(&self, paths: &[S]) -> Result<SyncReport> {
        let mut report = SyncReport::start(self.options.dry_run);

        if paths.is_empty() {
            tracing::debug!("Authoritative list is empty, nothing to do");
            return Ok(report.finish());
        }

        let entries = collect_entries(paths)?;

        self.cleanup(&entries, &mut report)?;

        let plan = self.diff(&entries)?;
        report.up_to_date.clone_from(&plan.up_to_date);
        report.skipped.clone_from(&plan.skipped);

        self.compress_marked(&plan, &mut report)?;

        Ok(report.finish())
    }

    /// Fetch the list from a collaborator, then [`run`](Self::run).
    ///
    /// A collaborator error aborts before any filesystem access.
    pub fn run_from(&self, source: &dyn PathSource) -> Result<SyncReport> {
        let paths = source.list_paths()?;
        self.run(paths.as_slice())
    }

    /// Compute the diff without modifying anything.
    ///
    /// Runs validation and the diff phase only. Obsolete archives are not
    /// considered.
    pub fn plan<S: AsRef<str>>(&self, paths: &[S]) -> Result<SyncPlan> {
        if paths.is_empty() {
            return Ok(SyncPlan::default());
        }
        let entries = collect_entries(paths)?;
        self.diff(&entries)
    }

    /// Get the source root
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Get the target root
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    fn cleanup(&self, entries: &[Entry], report: &mut SyncReport) -> Result<()> {
        let tag = |source: mirror_fs::Error| Error::phase(Phase::Cleanup, source);

        match fs::metadata(&self.target_root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::debug!(
                    target_root = %self.target_root.display(),
                    "Target root is not a directory, nothing to clean"
                );
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(tag(mirror_fs::Error::NotFound {
                    path: self.target_root.clone(),
                }));
            }
            Err(e) => return Err(tag(mirror_fs::Error::access(&self.target_root, e))),
        }

        let members: HashSet<&str> = entries.iter().map(|e| e.base_name.as_str()).collect();
        let archives = find_matching(&self.target_root, &archive_pattern()).map_err(tag)?;

        for archive in archives {
            let Some(stem) = archive
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(archive_stem)
            else {
                continue;
            };
            if members.contains(stem) {
                continue;
            }

            if self.options.dry_run {
                tracing::info!(
                    archive = %archive.display(),
                    "[dry-run] Would remove obsolete archive"
                );
            } else {
                fs::remove_file(&archive)
                    .map_err(|e| tag(mirror_fs::Error::access(&archive, e)))?;
                tracing::info!(archive = %archive.display(), "Removed obsolete archive");
            }
            report.removed.push(archive);
        }

        tracing::info!(removed = report.removed.len(), "Cleanup finished");
        Ok(())
    }

    fn diff(&self, entries: &[Entry]) -> Result<SyncPlan> {
        let tag = |source: mirror_fs::Error| Error::phase(Phase::Diff, source);

        match fs::metadata(&self.source_root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(tag(mirror_fs::Error::NotADirectory {
                    path: self.source_root.clone(),
                }));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(tag(mirror_fs::Error::NotFound {
                    path: self.source_root.clone(),
                }));
            }
            Err(e) => return Err(tag(mirror_fs::Error::access(&self.source_root, e))),
        }

        let mut plan = SyncPlan::default();
        for entry in entries {
            let relative = entry.path.strip_root();

            let Some(source) = get_entry_info(&self.source_root, relative, "").map_err(tag)?
            else {
                tracing::warn!(path = %entry.path, "Source entry does not exist, skipping");
                plan.skipped.push(entry.path.to_string());
                continue;
            };

            let archive = get_entry_info(&self.target_root, &entry.base_name, ARCHIVE_EXTENSION)
                .map_err(tag)?;

            let reason = match archive {
                None => ArchiveReason::Missing,
                Some(archive) if source.modified > archive.modified => ArchiveReason::Stale,
                Some(_) => {
                    tracing::debug!(path = %entry.path, "Archive is up to date");
                    plan.up_to_date.push(entry.path.to_string());
                    continue;
                }
            };

            tracing::debug!(path = %entry.path, %reason, "Marked for compression");
            plan.to_compress.push(PlannedEntry {
                path: entry.path.to_string(),
                base_name: entry.base_name.clone(),
                reason,
            });
        }

        tracing::info!(
            marked = plan.to_compress.len(),
            up_to_date = plan.up_to_date.len(),
            skipped = plan.skipped.len(),
            "Diff finished"
        );
        Ok(plan)
    }

    fn compress_marked(&self, plan: &SyncPlan, report: &mut SyncReport) -> Result<()> {
        for planned in &plan.to_compress {
            let source = NormalizedPath::new(&planned.path).under(&self.source_root);

            let output = if self.options.dry_run {
                tracing::info!(
                    path = %planned.path,
                    reason = %planned.reason,
                    "[dry-run] Would compress"
                );
                self.target_root.join(archive_name(&planned.base_name))
            } else {
                compress(&source, &self.target_root, &self.options.compress)
                    .map_err(|e| Error::phase(Phase::Compress, e))?
            };

            report.archived.push(ArchivedEntry {
                path: planned.path.clone(),
                reason: planned.reason,
                output,
            });
        }

        tracing::info!(archived = report.archived.len(), "Compress finished");
        Ok(())
    }
}

/// Synchronize `target_root` with `source_root` using default options.
///
/// See [`SyncEngine::run`] for the contract.
pub fn sync_and_compress<S: AsRef<str>>(
    source_root: &Path,
    target_root: &Path,
    paths: &[S],
) -> Result<SyncReport> {
    SyncEngine::new(source_root, target_root, SyncOptions::default())?.run(paths)
}

/// Validate and de-duplicate the list, keeping first occurrences in order.
fn collect_entries<S: AsRef<str>>(paths: &[S]) -> Result<Vec<Entry>> {
    let mut by_base: HashMap<String, NormalizedPath> = HashMap::new();
    let mut entries = Vec::with_capacity(paths.len());

    for raw in paths {
        let raw = raw.as_ref();
        let path = NormalizedPath::new(raw);
        let base_name = match path.file_name() {
            Some(name) if name != "." && name != ".." => name.to_string(),
            _ => {
                return Err(Error::invalid_input(format!(
                    "list entry {raw:?} has no usable base name"
                )));
            }
        };

        match by_base.get(&base_name) {
            Some(existing) if same_entry(existing, &path) => {
                tracing::debug!(path = %path, "Duplicate list entry, evaluating once");
            }
            Some(existing) => {
                return Err(Error::invalid_input(format!(
                    "list entries {existing} and {path} both map to archive {}",
                    archive_name(&base_name)
                )));
            }
            None => {
                by_base.insert(base_name.clone(), path.clone());
                entries.push(Entry { path, base_name });
            }
        }
    }

    Ok(entries)
}

fn same_entry(a: &NormalizedPath, b: &NormalizedPath) -> bool {
    a.strip_root().trim_end_matches('/') == b.strip_root().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_roots() {
        assert!(matches!(
            SyncEngine::new("", "/archives", SyncOptions::default()),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            SyncEngine::new("/media", "", SyncOptions::default()),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn collect_entries_uses_last_component() {
        let entries = collect_entries(&["movies/Alpha", "/movies/Beta/", "Gamma.mkv"]).unwrap();
        let bases: Vec<&str> = entries.iter().map(|e| e.base_name.as_str()).collect();
        assert_eq!(bases, vec!["Alpha", "Beta", "Gamma.mkv"]);
    }

    #[test]
    fn collect_entries_folds_identical_duplicates() {
        let entries = collect_entries(&["movies/Alpha", "/movies/Alpha/", "movies/Alpha"]).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.as_str(), "movies/Alpha");
    }

    #[test]
    fn collect_entries_rejects_base_name_collisions() {
        let result = collect_entries(&["movies/Alpha", "shows/Alpha"]);
        match result {
            Err(Error::InvalidInput { message }) => {
                assert!(message.contains("Alpha.tar.gz"), "got: {message}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn collect_entries_rejects_unusable_names() {
        for bad in ["", "/", "movies/..", "."] {
            assert!(
                matches!(collect_entries(&[bad]), Err(Error::InvalidInput { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_list_is_noop_even_with_missing_roots() {
        let engine = SyncEngine::new(
            "/definitely/not/here/source",
            "/definitely/not/here/target",
            SyncOptions::default(),
        )
        .unwrap();
        let paths: [&str; 0] = [];

        let report = engine.run(&paths).unwrap();

        assert!(!report.changed());
        assert!(report.skipped.is_empty());
    }
}
