//! Loading of settings files that are not plain JSON

use async_trait::async_trait;
use serde_json::Value;
use settings_fs::{ConfigStore, NormalizedPath};

use super::ConfigDocument;
use crate::error::{Error, ErrorCode};

/// What the resolver hands to a loader alongside the file path.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    pub project_root: &'a NormalizedPath,
    /// Code to tag any load-time failure with.
    pub load_error_code: ErrorCode,
}

impl LoadContext<'_> {
    /// Build a classified error tagged with this context's code.
    pub fn error(&self, path: &NormalizedPath, message: impl Into<String>) -> Error {
        Error::Load {
            code: self.load_error_code,
            file: path.to_native(),
            message: message.into(),
        }
    }
}

/// Ways a load can fail, distinguished by how the resolver reacts.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file cannot be resolved at all.
    #[error("Cannot find settings module {path}")]
    ModuleNotFound { path: NormalizedPath },

    /// Already a domain error; passed through unchanged.
    #[error(transparent)]
    Classified(#[from] Error),

    /// Raw filesystem failure; the resolver wraps it.
    #[error(transparent)]
    Fs(#[from] settings_fs::Error),
}

/// Loads settings files that the resolver does not read as JSON itself.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(
        &self,
        path: &NormalizedPath,
        context: &LoadContext<'_>,
    ) -> Result<ConfigDocument, LoadError>;
}

/// Default loader for TOML and YAML settings files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatLoader {
    store: ConfigStore,
}

impl FormatLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ModuleLoader for FormatLoader {
    async fn load(
        &self,
        path: &NormalizedPath,
        context: &LoadContext<'_>,
    ) -> Result<ConfigDocument, LoadError> {
        tracing::debug!(%path, project_root = %context.project_root, "Loading settings module");

        let value: Value = match self.store.load(path).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => {
                return Err(LoadError::ModuleNotFound { path: path.clone() });
            }
            Err(e @ settings_fs::Error::Io { .. }) => return Err(LoadError::Fs(e)),
            Err(e) => return Err(context.error(path, e.to_string()).into()),
        };

        ConfigDocument::try_from(value).map_err(|_| {
            LoadError::from(context.error(path, "settings must be a table at the top level"))
        })
    }
}
