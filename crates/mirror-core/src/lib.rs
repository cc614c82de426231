//! Synchronization policy for Media Archive Mirror
//!
//! This crate decides *which* archives to remove and (re)create and drives
//! the primitives in `mirror-fs` to do it:
//!
//! - **SyncEngine**: three strict phases per run (cleanup, diff, compress)
//! - **SyncReport**: what a run removed, archived, skipped and left alone
//! - **SyncConfig**: explicit, file-loadable run configuration
//! - **PathSource**: collaborators that supply the authoritative path list
//!
//! # Architecture
//!
//! ```text
//!        CLI / caller
//!             |
//!        mirror-core
//!             |
//!         mirror-fs
//!             |
//!         filesystem
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = mirror_core::sync_and_compress(
//!     Path::new("/srv/media"),
//!     Path::new("/srv/archives"),
//!     &["movies/Alpha", "movies/Beta"],
//! )?;
//! println!("archived {} entries", report.archived.len());
//! # Ok::<(), mirror_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod source;
pub mod sync;

pub use config::SyncConfig;
pub use error::{Error, Phase, Result};
pub use source::{ListFile, PathSource};
pub use sync::{
    ArchiveReason, ArchivedEntry, PlannedEntry, SyncEngine, SyncOptions, SyncPlan, SyncReport,
    sync_and_compress,
};
