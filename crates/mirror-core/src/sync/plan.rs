//! Diff phase output

use serde::{Deserialize, Serialize};

/// Why an entry needs a new archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveReason {
    /// No archive exists yet
    Missing,
    /// The source was modified after the archive
    Stale,
}

impl std::fmt::Display for ArchiveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Stale => write!(f, "stale"),
        }
    }
}

/// An entry marked for compression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEntry {
    /// Normalized path relative to the source root
    pub path: String,
    /// Archive stem
    pub base_name: String,
    pub reason: ArchiveReason,
}

/// Result of the diff phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    /// Entries to compress, in list order
    pub to_compress: Vec<PlannedEntry>,
    /// Entries whose archive is at least as new as the source
    pub up_to_date: Vec<String>,
    /// Entries whose source does not exist
    pub skipped: Vec<String>,
}
