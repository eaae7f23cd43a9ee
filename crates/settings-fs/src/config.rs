//! Format-aware loading of non-JSON settings files

use crate::{Error, NormalizedPath, Result};
use serde::de::DeserializeOwned;

/// Serialization formats a settings file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and deserializes the
/// content transparently.
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
    ///
    /// The file is read before the extension is checked, so a missing file
    /// reports [`Error::Io`] (`NotFound`) even for unsupported extensions.
    pub async fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let native_path = path.to_native();
        let content = tokio::fs::read_to_string(&native_path)
            .await
            .map_err(|e| Error::io(&native_path, e))?;

        let extension = path.extension().unwrap_or("");
        let format = Format::from_extension(extension).ok_or_else(|| Error::UnsupportedFormat {
            extension: extension.to_string(),
        })?;

        let parse_error = |message: String| Error::ConfigParse {
            path: native_path.clone(),
            format: format.name().into(),
            message,
        };

        match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        }
    }
}
