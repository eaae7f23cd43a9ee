//! Error types for settings-core

use std::path::PathBuf;

/// Result type for settings-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of error codes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A settings file is required but missing (non-interactive run).
    ConfigFileNotFound,
    /// A non-JSON settings file failed to load.
    ConfigFileError,
    /// Any other read/parse/write failure.
    ErrorReadingFile,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigFileNotFound => "CONFIG_FILE_NOT_FOUND",
            Self::ConfigFileError => "CONFIG_FILE_ERROR",
            Self::ErrorReadingFile => "ERROR_READING_FILE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified errors produced by settings resolution.
///
/// Every variant is a domain error: once a failure has been turned into an
/// `Error` it passes through every layer unchanged. Raw filesystem failures
/// stay as [`settings_fs::Error`] until they are wrapped in [`Error::ReadFile`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings file missing while running non-interactively
    #[error("Could not find a settings file at {file} for project {project_root}")]
    ConfigFileNotFound { file: PathBuf, project_root: PathBuf },

    /// Loader failure tagged with the code the resolver asked for
    #[error("{code}: failed to load {file}: {message}")]
    Load {
        code: ErrorCode,
        file: PathBuf,
        message: String,
    },

    /// Unclassified read/parse/write failure, wrapped once
    #[error("Error reading from {file}: {source}")]
    ReadFile {
        file: PathBuf,
        #[source]
        source: settings_fs::Error,
    },
}

impl Error {
    pub fn read_file(file: impl Into<PathBuf>, source: settings_fs::Error) -> Self {
        Self::ReadFile {
            file: file.into(),
            source,
        }
    }

    /// The code callers match on.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigFileNotFound { .. } => ErrorCode::ConfigFileNotFound,
            Self::Load { code, .. } => *code,
            Self::ReadFile { .. } => ErrorCode::ErrorReadingFile,
        }
    }
}
