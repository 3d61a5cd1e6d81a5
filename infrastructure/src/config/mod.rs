//! Configuration file loading for roundtable
//!
//! This module handles file I/O, merging of configuration sources, validation
//! and the hot-reloadable snapshot store. The priority order (highest to lowest):
//!
//! 1. `ROUNDTABLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 4. Default values

mod error;
mod file_config;
mod loader;
mod store;

pub use error::ConfigError;
pub use file_config::{
    FileAnthropicConfig, FileConfig, FileFeaturesConfig, FileModelConfig, FileModelsConfig,
    FileOpenAiConfig, FilePersistenceConfig, FilePolicyConfig, FileProvidersConfig,
    FileRoleOverride, FileRunnerConfig, FileServerConfig, FileTaskOverrides, FileXaiConfig,
};
pub use loader::{ConfigLoader, LoadedConfig};
pub use store::ConfigStore;
