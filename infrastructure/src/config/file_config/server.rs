//! Front-end, persistence and feature settings from TOML
//! (`[server]`, `[persistence]` and `[features]` sections)

use roundtable_application::FeatureFlags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP front end settings.
///
/// # Example
///
/// ```toml
/// [server]
/// bind = "127.0.0.1:8787"
/// api_key_env = "MASTER_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
    /// Environment variable holding the bearer token. Unset means no auth.
    pub api_key_env: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8787".to_string(),
            api_key_env: "MASTER_API_KEY".to_string(),
        }
    }
}

/// Run persistence. Without `runs_dir` nothing is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersistenceConfig {
    pub runs_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFeaturesConfig {
    /// Rewrite deep-mode answers with an editor pass
    pub polish: bool,
}

impl FileFeaturesConfig {
    pub fn to_feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            polish: self.polish,
        }
    }
}
