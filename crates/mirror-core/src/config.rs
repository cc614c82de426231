//! Run configuration
//!
//! Every value a run needs is carried explicitly; nothing is read from
//! process-wide state.

use std::path::{Path, PathBuf};

use mirror_fs::{CompressOptions, CompressionLevel, ConfigStore};
use serde::{Deserialize, Serialize};

use crate::sync::{SyncEngine, SyncOptions};
use crate::{Error, Result};

fn default_compression_level() -> u32 {
    CompressionLevel::DEFAULT
}

/// Configuration for a sync run, loadable from TOML, JSON or YAML.
///
/// ```toml
/// source_root = "/srv/media"
/// target_root = "/srv/archives"
/// compression_level = 7
/// list_file = "/etc/mirror/wanted.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    #[serde(default)]
    pub dry_run: bool,
    /// Newline-delimited authoritative path list
    #[serde(default)]
    pub list_file: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            compression_level: CompressionLevel::DEFAULT,
            dry_run: false,
            list_file: None,
        }
    }

    /// Load configuration from a file; format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        ConfigStore::new()
            .load(path)
            .map_err(|source| Error::Config {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Build validated run options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the compression level is outside `1..=9`.
    pub fn options(&self) -> Result<SyncOptions> {
        let level = CompressionLevel::new(self.compression_level).map_err(|e| match e {
            mirror_fs::Error::InvalidInput { message } => Error::invalid_input(message),
            other => Error::invalid_input(other.to_string()),
        })?;
        Ok(SyncOptions {
            compress: CompressOptions::with_level(level),
            dry_run: self.dry_run,
        })
    }

    /// Build an engine for this configuration.
    pub fn engine(&self) -> Result<SyncEngine> {
        SyncEngine::new(&self.source_root, &self.target_root, self.options()?)
    }
}
