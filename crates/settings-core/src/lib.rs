//! Project settings resolution
//!
//! This crate loads a project's settings file, overlays the sub-document for
//! the active testing type, migrates legacy keys in JSON files and persists
//! the result when it changed.
//!
//! # Architecture
//!
//! ```text
//!              caller (CLI / config loading)
//!                        |
//!                  settings-core
//!                        |
//!                   settings-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use settings_core::{ConfigResolver, ResolutionOptions};
//! use settings_fs::NormalizedPath;
//!
//! let resolver = ConfigResolver::new();
//! let root = NormalizedPath::new("/path/to/project");
//! let settings = resolver.resolve(&root, &ResolutionOptions::new()).await?;
//! let env = resolver.read_environment_overrides(&root).await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    ConfigDocument, ConfigFile, ConfigResolver, FormatLoader, LoadContext, LoadError,
    ModuleLoader, ResolutionOptions, ResolverSettings, RunArgs, TestingType, is_json_file,
};
pub use error::{Error, ErrorCode, Result};
