//! Model assignment from TOML (`[models]` section)

use roundtable_application::RoleModels;
use roundtable_domain::{ConfigIssue, ConfigIssueCode, ModelSpec, ProviderKind, Role, RoleTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_TEMPERATURE: f64 = 2.0;

/// One model assignment.
///
/// `model` may name an environment variable; when that variable is set its
/// value is used as the model id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        let spec = ModelSpec::dummy();
        Self {
            provider: spec.provider.to_string(),
            model: spec.model,
            temperature: spec.temperature,
            max_tokens: spec.max_tokens,
        }
    }
}

impl FileModelConfig {
    /// Resolve into a [`ModelSpec`], collecting issues under `field`.
    ///
    /// Invalid entries still resolve (to the dummy model) so that every
    /// issue in the file is reported at once.
    fn to_model_spec(
        &self,
        field: &str,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> (ModelSpec, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let provider = match self.provider.parse::<ProviderKind>() {
            Ok(provider) => provider,
            Err(_) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("{field}.provider"),
                        value: self.provider.clone(),
                        valid_values: ["anthropic", "openai", "xai", "dummy"]
                            .map(String::from)
                            .to_vec(),
                    },
                    format!("{field}.provider: unknown provider '{}'", self.provider),
                ));
                ProviderKind::Dummy
            }
        };

        let configured = self.model.trim();
        if configured.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: format!("{field}.model"),
                },
                format!("{field}.model: model name cannot be empty"),
            ));
        }
        let model = env(configured)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| configured.to_string());

        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: format!("{field}.temperature"),
                    value: self.temperature,
                },
                format!(
                    "{field}.temperature: {} is out of range, expected [0, {MAX_TEMPERATURE}]",
                    self.temperature
                ),
            ));
        }

        if self.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: format!("{field}.max_tokens"),
                    value: 0.0,
                },
                format!("{field}.max_tokens: must be greater than 0"),
            ));
        }

        let spec = ModelSpec::new(provider, model)
            .with_temperature(self.temperature.clamp(0.0, MAX_TEMPERATURE))
            .with_max_tokens(self.max_tokens.max(1));
        (spec, issues)
    }
}

/// Master and per-role models.
///
/// # Example
///
/// ```toml
/// [models.master]
/// provider = "anthropic"
/// model = "ANTHROPIC_MASTER_MODEL"   # env var holding the model id
/// temperature = 0.2
/// max_tokens = 2000
///
/// [models.roles.solver]
/// provider = "openai"
/// model = "gpt-4.1"
/// temperature = 0.3
/// max_tokens = 1200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub master: FileModelConfig,
    /// Keyed by lowercase role name
    pub roles: BTreeMap<String, FileModelConfig>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            master: FileModelConfig::default(),
            roles: Role::ALL
                .iter()
                .map(|role| (role.as_str().to_string(), FileModelConfig::default()))
                .collect(),
        }
    }
}

impl FileModelsConfig {
    /// Resolve into [`RoleModels`]. `env` looks up model ids that name an
    /// environment variable.
    pub fn to_role_models_with(
        &self,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> (RoleModels, Vec<ConfigIssue>) {
        let (master, mut issues) = self.master.to_model_spec("models.master", env);
        let mut roles = RoleTable::filled(ModelSpec::dummy());
        let mut seen = Vec::new();

        for (key, entry) in &self.roles {
            let field = format!("models.roles.{key}");
            let Ok(role) = key.parse::<Role>() else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: field.clone(),
                        value: key.clone(),
                        valid_values: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
                    },
                    format!("{field}: unknown role '{key}'"),
                ));
                continue;
            };
            let (spec, entry_issues) = entry.to_model_spec(&field, env);
            issues.extend(entry_issues);
            roles[role] = spec;
            seen.push(role);
        }

        for role in Role::ALL {
            if !seen.contains(&role) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingRoleModel {
                        role: role.as_str().to_string(),
                    },
                    format!("models.roles.{role}: no model configured", role = role.as_str()),
                ));
            }
        }

        (RoleModels::new(master, roles), issues)
    }

    /// Every configured model with its field path
    pub fn entries(&self) -> impl Iterator<Item = (String, &FileModelConfig)> {
        std::iter::once(("models.master".to_string(), &self.master)).chain(
            self.roles
                .iter()
                .map(|(key, entry)| (format!("models.roles.{key}"), entry)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_cover_every_role() {
        let (models, issues) = FileModelsConfig::default().to_role_models_with(&no_env);
        assert!(issues.is_empty());
        for role in Role::ALL {
            assert_eq!(models.for_role(role), &ModelSpec::dummy());
        }
    }

    #[test]
    fn test_missing_and_unknown_roles() {
        let toml_str = r#"
[roles.solver]
provider = "openai"
model = "gpt-4.1"

[roles.oracle]
provider = "openai"
model = "gpt-4.1"
"#;
        let config: FileModelsConfig = toml::from_str(toml_str).unwrap();
        let (models, issues) = config.to_role_models_with(&no_env);

        assert_eq!(models.for_role(Role::Solver).provider, ProviderKind::OpenAi);
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::InvalidEnumValue { value, .. } if value == "oracle"
        )));
        let missing = issues
            .iter()
            .filter(|i| matches!(i.code, ConfigIssueCode::MissingRoleModel { .. }))
            .count();
        assert_eq!(missing, 6);
    }

    #[test]
    fn test_model_id_from_environment() {
        let mut config = FileModelsConfig::default();
        config.master = FileModelConfig {
            provider: "anthropic".to_string(),
            model: "MASTER_MODEL".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
        };
        let env = |name: &str| (name == "MASTER_MODEL").then(|| "claude-sonnet-4-5".to_string());

        let (models, issues) = config.to_role_models_with(&env);
        assert!(issues.is_empty());
        assert_eq!(models.master.model, "claude-sonnet-4-5");
        assert_eq!(models.master.max_tokens, 2000);
    }

    #[test]
    fn test_invalid_entry_fields() {
        let mut config = FileModelsConfig::default();
        config.master = FileModelConfig {
            provider: "mystery".to_string(),
            model: " ".to_string(),
            temperature: 3.0,
            max_tokens: 0,
        };
        let (_, issues) = config.to_role_models_with(&no_env);
        assert_eq!(issues.len(), 4);
        assert!(issues.iter().all(ConfigIssue::is_error));
    }
}
