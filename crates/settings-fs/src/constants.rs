//! Conventional file names for project settings.

use std::path::Path;

/// Well-known settings files that live at a project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFile {
    /// The main settings file (`cypress.json`)
    Config,
    /// Environment overrides (`cypress.env.json`)
    EnvOverrides,
}

impl SettingsFile {
    /// Get the string representation of the file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "cypress.json",
            Self::EnvOverrides => "cypress.env.json",
        }
    }
}

impl AsRef<Path> for SettingsFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SettingsFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SettingsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
