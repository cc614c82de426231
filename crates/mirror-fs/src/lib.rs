//! Archive I/O primitives for Media Archive Mirror
//!
//! Pure filesystem operations with no knowledge of which entries should be
//! synchronized:
//!
//! - [`find_matching`]: recursive wildcard search for files
//! - [`get_entry_info`]: metadata lookup that separates "absent" from "failed"
//! - [`compress`]: single-entry, structure-preserving `tar.gz` creation
//! - [`ConfigStore`]: format-agnostic configuration loading

pub mod compress;
pub mod config;
pub mod constants;
pub mod error;
pub mod find;
pub mod info;
pub mod path;

pub use compress::{CompressOptions, CompressionLevel, compress};
pub use config::ConfigStore;
pub use constants::{ARCHIVE_EXTENSION, archive_name, archive_pattern, archive_stem};
pub use error::{Error, Result};
pub use find::{WildcardPattern, find_matching};
pub use info::{EntryInfo, get_entry_info};
pub use path::NormalizedPath;
