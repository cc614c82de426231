//! Error types for mirror-core

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Removing archives that are no longer listed
    Cleanup,
    /// Deciding which entries need a new archive
    Diff,
    /// Writing archives
    Compress,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleanup => "cleanup",
            Self::Diff => "diff",
            Self::Compress => "compress",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Empty roots, unusable list entries or colliding base-names
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A filesystem failure, tagged with the phase it aborted
    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: Phase,
        #[source]
        source: mirror_fs::Error,
    },

    /// Configuration file could not be loaded
    #[error("Failed to load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// The authoritative path list could not be obtained
    #[error("Failed to list paths from {origin}: {source}")]
    PathSource {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn phase(phase: Phase, source: mirror_fs::Error) -> Self {
        Self::Phase { phase, source }
    }

    /// The phase that failed, if this error aborted a run.
    pub fn failed_phase(&self) -> Option<Phase> {
        match self {
            Self::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// The underlying filesystem error, if any.
    pub fn fs_error(&self) -> Option<&mirror_fs::Error> {
        match self {
            Self::Phase { source, .. } | Self::Config { source, .. } => Some(source),
            _ => None,
        }
    }
}
