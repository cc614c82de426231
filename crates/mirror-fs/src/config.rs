//! Format-agnostic configuration loading

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and deserializes
/// transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let extension = NormalizedPath::new(path)
            .extension()
            .unwrap_or("")
            .to_lowercase();

        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        let format = match extension.as_str() {
            "toml" => "TOML",
            "json" => "JSON",
            "yaml" | "yml" => "YAML",
            _ => {
                return Err(Error::UnsupportedFormat {
                    extension: extension.clone(),
                });
            }
        };

        let content = fs::read_to_string(path).map_err(|e| Error::access(path, e))?;

        match format {
            "TOML" => toml::from_str(&content).map_err(|e| parse_error(format, e.to_string())),
            "JSON" => {
                serde_json::from_str(&content).map_err(|e| parse_error(format, e.to_string()))
            }
            _ => serde_yaml::from_str(&content).map_err(|e| parse_error(format, e.to_string())),
        }
    }
}
