//! SyncEngine for keeping an archive directory in line with a source tree
//!
//! This module provides:
//! - **engine**: the three-phase run (cleanup, diff, compress)
//! - **plan**: the diff result, entries to (re)archive and why
//! - **report**: what a run did

mod engine;
mod plan;
mod report;

pub use engine::{SyncEngine, SyncOptions, sync_and_compress};
pub use plan::{ArchiveReason, PlannedEntry, SyncPlan};
pub use report::{ArchivedEntry, SyncReport};
