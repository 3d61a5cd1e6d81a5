//! Per-category role overrides from TOML (`[task_overrides]` section)

use roundtable_domain::{ConfigIssue, ConfigIssueCode, Role, RoleOverrides, TaskCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRoleOverride {
    pub enabled: bool,
}

/// Role enable/disable switches keyed by category, then role.
///
/// # Example
///
/// ```toml
/// [task_overrides.PROMPT_ENGINEERING.grok]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTaskOverrides(pub BTreeMap<String, BTreeMap<String, FileRoleOverride>>);

impl FileTaskOverrides {
    /// Convert to [`RoleOverrides`]; unknown category or role keys are errors.
    pub fn to_role_overrides(&self) -> (RoleOverrides, Vec<ConfigIssue>) {
        let mut overrides = RoleOverrides::new();
        let mut issues = Vec::new();

        for (category_key, roles) in &self.0 {
            let Ok(category) = category_key.parse::<TaskCategory>() else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "task_overrides".to_string(),
                        value: category_key.clone(),
                        valid_values: TaskCategory::ALL
                            .iter()
                            .map(|c| c.as_str().to_string())
                            .collect(),
                    },
                    format!("task_overrides: unknown category '{category_key}'"),
                ));
                continue;
            };

            for (role_key, entry) in roles {
                match role_key.parse::<Role>() {
                    Ok(role) => overrides.set_enabled(category, role, entry.enabled),
                    Err(_) => issues.push(ConfigIssue::error(
                        ConfigIssueCode::InvalidEnumValue {
                            field: format!("task_overrides.{category_key}"),
                            value: role_key.clone(),
                            valid_values: Role::ALL
                                .iter()
                                .map(|r| r.as_str().to_string())
                                .collect(),
                        },
                        format!("task_overrides.{category_key}: unknown role '{role_key}'"),
                    )),
                }
            }
        }

        (overrides, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        task_overrides: FileTaskOverrides,
    }

    #[test]
    fn test_parse_overrides() {
        let toml_str = r#"
[task_overrides.PROMPT_ENGINEERING.grok]
enabled = false

[task_overrides.VERBAL_REASONING.critic]
enabled = true
"#;
        let wrapper: Wrapper = toml::from_str(toml_str).unwrap();
        let (overrides, issues) = wrapper.task_overrides.to_role_overrides();
        assert!(issues.is_empty());
        assert!(!overrides.is_enabled(TaskCategory::PromptEngineering, Role::Grok));
        assert!(overrides.is_enabled(TaskCategory::VerbalReasoning, Role::Critic));
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let toml_str = r#"
[task_overrides.COOKING.solver]
enabled = false

[task_overrides.MIXED.oracle]
enabled = false
"#;
        let wrapper: Wrapper = toml::from_str(toml_str).unwrap();
        let (overrides, issues) = wrapper.task_overrides.to_role_overrides();
        assert_eq!(issues.len(), 2);
        assert!(overrides.is_empty());
    }
}
