//! Run report

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::ArchiveReason;

/// An archive written (or, in a dry run, one that would be written).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedEntry {
    /// Normalized path relative to the source root
    pub path: String,
    pub reason: ArchiveReason,
    /// Archive location under the target root
    pub output: PathBuf,
}

/// Report from a sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// If true, nothing on disk was changed
    pub dry_run: bool,
    /// Obsolete archives removed from the target root
    pub removed: Vec<PathBuf>,
    /// Entries (re)archived
    pub archived: Vec<ArchivedEntry>,
    /// Entries whose archive was already fresh
    pub up_to_date: Vec<String>,
    /// Entries whose source does not exist
    pub skipped: Vec<String>,
}

impl SyncReport {
    /// Start an empty report stamped with the current time
    pub fn start(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            dry_run,
            removed: Vec::new(),
            archived: Vec::new(),
            up_to_date: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Stamp the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Whether the run modified (or would modify) the target root
    pub fn changed(&self) -> bool {
        !self.removed.is_empty() || !self.archived.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_unchanged() {
        let report = SyncReport::start(false).finish();
        assert!(!report.changed());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn removal_counts_as_change() {
        let mut report = SyncReport::start(true);
        report.removed.push(PathBuf::from("/archives/Orphan.tar.gz"));
        assert!(report.changed());
    }

    #[test]
    fn serializes_reason_in_lowercase() {
        let mut report = SyncReport::start(false);
        report.archived.push(ArchivedEntry {
            path: "movies/Alpha".into(),
            reason: ArchiveReason::Stale,
            output: PathBuf::from("/archives/Alpha.tar.gz"),
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["archived"][0]["reason"], "stale");
        assert_eq!(json["dry_run"], false);
    }
}
