//! Resolution options

use serde::{Deserialize, Deserializer, de};
use std::path::PathBuf;

/// Which kind of test run the settings are resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestingType {
    E2e,
    Component,
}

impl TestingType {
    /// Key of the nested sub-document that overlays the top level.
    pub fn overlay_key(&self) -> &'static str {
        match self {
            Self::E2e => "e2e",
            Self::Component => "component",
        }
    }
}

/// Which file backs the settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Use the conventional file name under the project root.
    #[default]
    Default,
    /// No file at all: resolve to an empty document without I/O.
    Disabled,
    /// An explicit file, absolute or relative to the project root.
    Path(PathBuf),
}

impl<'de> Deserialize<'de> for ConfigFile {
    /// Accepts `null`, `false` or a path string.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Path(PathBuf),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Self::Default),
            Some(Raw::Flag(false)) => Ok(Self::Disabled),
            Some(Raw::Flag(true)) => Err(de::Error::custom(
                "configFile must be a path or false, not true",
            )),
            Some(Raw::Path(path)) => Ok(Self::Path(path)),
        }
    }
}

/// Arguments of the surrounding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunArgs {
    /// Set when running a project non-interactively.
    #[serde(default)]
    pub run_project: Option<PathBuf>,
}

/// Options controlling a single resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOptions {
    #[serde(default)]
    pub testing_type: Option<TestingType>,
    #[serde(default)]
    pub config_file: ConfigFile,
    #[serde(default)]
    pub args: RunArgs,
}

impl ResolutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_testing_type(mut self, testing_type: TestingType) -> Self {
        self.testing_type = Some(testing_type);
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = ConfigFile::Path(path.into());
        self
    }

    pub fn without_config_file(mut self) -> Self {
        self.config_file = ConfigFile::Disabled;
        self
    }

    pub fn with_run_project(mut self, project: impl Into<PathBuf>) -> Self {
        self.args.run_project = Some(project.into());
        self
    }

    pub fn is_component_testing(&self) -> bool {
        self.testing_type == Some(TestingType::Component)
    }

    /// A non-interactive run must not bootstrap missing files.
    pub fn is_interactive(&self) -> bool {
        self.args.run_project.is_none()
    }

    /// The overlay key in effect; unset testing type behaves like e2e.
    pub fn overlay_key(&self) -> &'static str {
        self.testing_type.unwrap_or(TestingType::E2e).overlay_key()
    }
}
