//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts itself into application types and reports the
//! problems it finds as [`ConfigIssue`]s instead of failing fast.

mod models;
mod overrides;
mod policy;
mod providers;
mod runner;
mod server;

pub use models::{FileModelConfig, FileModelsConfig};
pub use overrides::{FileRoleOverride, FileTaskOverrides};
pub use policy::FilePolicyConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig, FileXaiConfig};
pub use runner::FileRunnerConfig;
pub use server::{FileFeaturesConfig, FilePersistenceConfig, FileServerConfig};

use roundtable_application::OrchestrationConfig;
use roundtable_domain::{ConfigIssue, ConfigIssueCode, ProviderKind};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Cost caps and thresholds
    pub policy: FilePolicyConfig,
    /// Dispatcher and retry limits
    pub runner: FileRunnerConfig,
    /// Master and per-role model assignments
    pub models: FileModelsConfig,
    /// Per-category role switches
    pub task_overrides: FileTaskOverrides,
    /// External provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// HTTP front end
    pub server: FileServerConfig,
    /// Run recording
    pub persistence: FilePersistenceConfig,
    pub features: FileFeaturesConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_orchestration_config().1
    }

    /// Build the orchestration snapshot, reading model ids and credentials
    /// from the process environment.
    pub fn to_orchestration_config(&self) -> (OrchestrationConfig, Vec<ConfigIssue>) {
        self.to_orchestration_config_with(&|name| std::env::var(name).ok())
    }

    /// Build the orchestration snapshot and collect every issue. It checks:
    /// 1. Policy ranges and threshold order
    /// 2. Runner limits
    /// 3. Model entries (provider, name, temperature, max tokens, coverage of every role)
    /// 4. Override keys
    /// 5. Credentials of enabled providers, and models routed to disabled ones (warnings)
    pub fn to_orchestration_config_with(
        &self,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> (OrchestrationConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (policy, policy_issues) = self.policy.to_policy();
        issues.extend(policy_issues);

        let (execution, runner_issues) = self.runner.to_execution_params();
        issues.extend(runner_issues);

        let (models, model_issues) = self.models.to_role_models_with(env);
        issues.extend(model_issues);

        let (overrides, override_issues) = self.task_overrides.to_role_overrides();
        issues.extend(override_issues);

        issues.extend(self.providers.credential_issues(env));
        issues.extend(self.disabled_provider_issues());

        let config = OrchestrationConfig::default()
            .with_policy(policy.with_overrides(overrides))
            .with_execution(execution)
            .with_models(models)
            .with_features(self.features.to_feature_flags());

        (config, issues)
    }

    fn disabled_provider_issues(&self) -> Vec<ConfigIssue> {
        self.models
            .entries()
            .filter_map(|(field, entry)| {
                let provider = entry.provider.parse::<ProviderKind>().ok()?;
                (!self.providers.is_enabled(provider)).then(|| {
                    ConfigIssue::warning(
                        ConfigIssueCode::ProviderDisabled {
                            field: field.clone(),
                            provider: provider.to_string(),
                        },
                        format!(
                            "{field}: provider '{provider}' is disabled; calls will use the dummy provider"
                        ),
                    )
                })
            })
            .collect()
    }
}
