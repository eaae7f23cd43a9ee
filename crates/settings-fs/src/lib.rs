//! Filesystem layer for the project settings resolver
//!
//! Provides normalized path handling, atomic locked writes, async JSON
//! read/write and format-aware loading of non-JSON settings files.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format};
pub use constants::SettingsFile;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
