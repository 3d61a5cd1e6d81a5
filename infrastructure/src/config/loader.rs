//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use roundtable_application::OrchestrationConfig;
use roundtable_domain::{ConfigIssue, has_errors};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PROJECT_FILES: [&str; 2] = ["roundtable.toml", ".roundtable.toml"];
const ENV_PREFIX: &str = "ROUNDTABLE_";

/// A validated configuration ready to serve requests
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub file: FileConfig,
    pub orchestration: OrchestrationConfig,
    /// Non-fatal issues found during validation
    pub warnings: Vec<ConfigIssue>,
    /// The file the configuration came from, if any
    pub source: Option<PathBuf>,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ROUNDTABLE_*` environment variables (`__` separates nesting,
    ///    e.g. `ROUNDTABLE_RUNNER__CONCURRENCY=4`)
    /// 2. Explicit config path (if provided; must exist)
    /// 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        } else if let Some(path) = Self::project_config_path() {
            debug!("Using project config {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(|e| ConfigError::Parse(Box::new(e)))
    }

    /// Load, validate and resolve.
    ///
    /// Warnings are logged and returned; any error-severity issue fails the
    /// whole load.
    pub fn load_validated(config_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let file = Self::load(config_path)?;
        let source = config_path
            .map(Path::to_path_buf)
            .or_else(Self::project_config_path);
        Self::resolve(file, source)
    }

    /// Validate and resolve an already-loaded file configuration.
    pub fn resolve(file: FileConfig, source: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
        let (orchestration, issues) = file.to_orchestration_config();
        if has_errors(&issues) {
            return Err(ConfigError::Invalid(
                issues.into_iter().filter(ConfigIssue::is_error).collect(),
            ));
        }
        for issue in &issues {
            warn!("{}", issue);
        }
        Ok(LoadedConfig {
            file,
            orchestration,
            warnings: issues,
            source,
        })
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
