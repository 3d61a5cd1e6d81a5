//! Orchestration configuration container.
//!
//! [`OrchestrationConfig`] groups the split configuration types into the one
//! immutable value a request reads. Infrastructure builds it from the config
//! file; [`ConfigSource`](crate::ports::config_source::ConfigSource) hands
//! out snapshots of it.

use super::{ExecutionParams, PolicyConfig, RoleModels};

/// Optional pipeline stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Rewrite deep-mode answers with an editor call
    pub polish: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationConfig {
    policy: PolicyConfig,
    models: RoleModels,
    execution: ExecutionParams,
    features: FeatureFlags,
}

impl OrchestrationConfig {
    pub fn new(
        policy: PolicyConfig,
        models: RoleModels,
        execution: ExecutionParams,
        features: FeatureFlags,
    ) -> Self {
        Self {
            policy,
            models,
            execution,
            features,
        }
    }

    // ==================== Accessors ====================

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn models(&self) -> &RoleModels {
        &self.models
    }

    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    // ==================== Builder Methods ====================

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_models(mut self, models: RoleModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{ModelSpec, ProviderKind, Role};

    #[test]
    fn test_default_is_offline() {
        let config = OrchestrationConfig::default();
        assert!(
            config
                .models()
                .iter()
                .all(|(_, m)| m.provider == ProviderKind::Dummy)
        );
        assert_eq!(config.policy().ask_user_threshold, 0.7);
        assert!(!config.features().polish);
    }

    #[test]
    fn test_builders() {
        let model = ModelSpec::new(ProviderKind::OpenAi, "gpt-4o-mini");
        let config = OrchestrationConfig::default()
            .with_models(RoleModels::default().with_role(Role::Impl, model.clone()))
            .with_features(FeatureFlags { polish: true });

        assert_eq!(config.models().polish(), &model);
        assert_eq!(config.models().for_role(Role::Solver), &ModelSpec::dummy());
        assert!(config.features().polish);
    }
}
