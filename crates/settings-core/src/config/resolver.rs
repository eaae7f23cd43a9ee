//! Settings resolution: load, overlay, migrate, persist
//!
//! The `ConfigResolver` reads a project's settings file fresh on every call.
//! JSON files are migrated in place when they still carry legacy keys; any
//! other file kind goes through a [`ModuleLoader`] and is returned as loaded.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use settings_fs::{NormalizedPath, RobustnessConfig, SettingsFile, io};

use super::loader::{FormatLoader, LoadContext, LoadError, ModuleLoader};
use super::options::{ConfigFile, ResolutionOptions};
use super::{ConfigDocument, rewrite};
use crate::{Error, ErrorCode, Result};

/// Whether a settings file is read as JSON (and therefore migrated).
pub fn is_json_file(path: &NormalizedPath) -> bool {
    path.as_str().ends_with(".json")
}

/// File names and write behaviour used by a [`ConfigResolver`].
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// File used when the options do not name one.
    pub default_config_file: String,
    /// Environment override file, relative to the project root.
    pub env_file: String,
    pub robustness: RobustnessConfig,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_config_file: SettingsFile::Config.as_str().to_string(),
            env_file: SettingsFile::EnvOverrides.as_str().to_string(),
            robustness: RobustnessConfig::default(),
        }
    }
}

impl ResolverSettings {
    pub fn with_default_config_file(mut self, name: impl Into<String>) -> Self {
        self.default_config_file = name.into();
        self
    }

    pub fn with_env_file(mut self, name: impl Into<String>) -> Self {
        self.env_file = name.into();
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }
}

/// Resolves the effective settings document of a project.
///
/// Holds no per-project state: every call re-reads from disk, so sequential
/// calls always observe the latest file contents.
pub struct ConfigResolver {
    settings: ResolverSettings,
    loader: Arc<dyn ModuleLoader>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Create a resolver with default file names and the [`FormatLoader`].
    pub fn new() -> Self {
        Self::with_settings(ResolverSettings::default())
    }

    pub fn with_settings(settings: ResolverSettings) -> Self {
        Self {
            settings,
            loader: Arc::new(FormatLoader::new()),
        }
    }

    /// Replace the loader used for non-JSON settings files.
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// The configured file name, or `None` when the file is disabled.
    pub fn resolve_config_file_name(&self, options: &ResolutionOptions) -> Option<PathBuf> {
        match &options.config_file {
            ConfigFile::Disabled => None,
            ConfigFile::Path(path) => Some(path.clone()),
            ConfigFile::Default => Some(PathBuf::from(&self.settings.default_config_file)),
        }
    }

    /// The settings file location, or `None` when the file is disabled.
    ///
    /// Absolute names are used verbatim; relative ones are joined under
    /// `project_root`.
    ///
    /// [`NormalizedPath`] is UTF-8, so a name that is not valid UTF-8 is
    /// converted lossily (invalid sequences become U+FFFD) and a warning is
    /// logged.
    pub fn resolve_config_file_path(
        &self,
        project_root: &NormalizedPath,
        options: &ResolutionOptions,
    ) -> Option<NormalizedPath> {
        let name = self.resolve_config_file_name(options)?;
        if name.to_str().is_none() {
            tracing::warn!(
                name = %name.display(),
                "Settings file name is not valid UTF-8, using a lossy conversion"
            );
        }
        Some(NormalizedPath::new(project_root.to_native().join(name)))
    }

    /// Resolve the effective settings of the project at `project_root`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigFileNotFound`] when the file is missing and the run
    ///   is non-interactive (`args.run_project` set).
    /// - [`Error::Load`] when the module loader rejects the file.
    /// - [`Error::ReadFile`] for every other read, parse or write failure.
    pub async fn resolve(
        &self,
        project_root: &NormalizedPath,
        options: &ResolutionOptions,
    ) -> Result<ConfigDocument> {
        let Some(file) = self.resolve_config_file_path(project_root, options) else {
            tracing::debug!(%project_root, "Settings file disabled, using empty settings");
            return Ok(ConfigDocument::new());
        };
        let is_json = is_json_file(&file);

        let loaded = match self.load(project_root, &file, is_json).await {
            Ok(doc) => doc,
            Err(LoadError::ModuleNotFound { .. }) => {
                self.bootstrap(project_root, &file, options).await?
            }
            Err(LoadError::Fs(e)) if is_json && e.is_not_found() => {
                self.bootstrap(project_root, &file, options).await?
            }
            Err(LoadError::Classified(e)) => return Err(e),
            Err(LoadError::Fs(e)) => return Err(Error::read_file(file.to_native(), e)),
        };

        let effective = match loaded.overlay(options.overlay_key()) {
            Some(merged) => {
                tracing::debug!(%file, overlay = options.overlay_key(), "Applied testing type overlay");
                merged
            }
            None => loaded,
        };

        if !is_json {
            return Ok(effective);
        }

        let migration = rewrite::migrate(&effective);
        if migration.document == effective {
            return Ok(effective);
        }

        tracing::info!(%file, rules = ?migration.applied, "Migrating legacy settings keys");
        io::write_json(&file, &migration.document, self.settings.robustness)
            .await
            .map_err(|e| Error::read_file(file.to_native(), e))?;

        Ok(migration.document)
    }

    /// Read the environment override file next to the settings file.
    ///
    /// A missing file yields an empty document.
    pub async fn read_environment_overrides(
        &self,
        project_root: &NormalizedPath,
    ) -> Result<ConfigDocument> {
        let file = project_root.join(&self.settings.env_file);

        match io::read_json::<ConfigDocument>(&file).await {
            Ok(doc) => Ok(doc),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%file, "No environment overrides found");
                Ok(ConfigDocument::new())
            }
            Err(e) => Err(Error::read_file(file.to_native(), e)),
        }
    }

    /// The `projectId` of the resolved settings, if any.
    ///
    /// Never fails: any resolution error is logged and absorbed to `None`.
    pub async fn resolve_project_id(
        &self,
        project_root: &NormalizedPath,
        options: &ResolutionOptions,
    ) -> Option<String> {
        match self.resolve(project_root, options).await {
            Ok(doc) => match doc.get("projectId")? {
                Value::String(id) => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            },
            Err(e) => {
                tracing::debug!(%project_root, code = %e.code(), error = %e, "Could not resolve project id");
                None
            }
        }
    }

    async fn load(
        &self,
        project_root: &NormalizedPath,
        file: &NormalizedPath,
        is_json: bool,
    ) -> std::result::Result<ConfigDocument, LoadError> {
        if is_json {
            return Ok(io::read_json::<ConfigDocument>(file).await?);
        }

        let context = LoadContext {
            project_root,
            load_error_code: ErrorCode::ConfigFileError,
        };
        self.loader.load(file, &context).await
    }

    /// Missing settings file: fail for non-interactive runs, otherwise
    /// create an empty one and carry on with it.
    async fn bootstrap(
        &self,
        project_root: &NormalizedPath,
        file: &NormalizedPath,
        options: &ResolutionOptions,
    ) -> Result<ConfigDocument> {
        if !options.is_interactive() {
            tracing::warn!(%file, %project_root, "Settings file missing in non-interactive run");
            return Err(Error::ConfigFileNotFound {
                file: file.to_native(),
                project_root: project_root.to_native(),
            });
        }

        tracing::info!(%file, "No settings file found, creating an empty one");
        let empty = ConfigDocument::new();
        io::write_json(file, &empty, self.settings.robustness)
            .await
            .map_err(|e| Error::read_file(file.to_native(), e))?;

        Ok(empty)
    }
}
