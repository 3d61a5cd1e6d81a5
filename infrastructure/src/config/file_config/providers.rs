//! Provider configuration from TOML (`[providers]` section)

use roundtable_domain::{ConfigIssue, ConfigIssueCode, ProviderKind};
use serde::{Deserialize, Serialize};

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Base URL for the OpenAI API (any chat-completions compatible endpoint).
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
        }
    }
}

/// xAI provider configuration (OpenAI-compatible wire format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileXaiConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "XAI_API_KEY").
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for FileXaiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key_env: "XAI_API_KEY".to_string(),
            base_url: "https://api.x.ai".to_string(),
        }
    }
}

/// External providers. All are disabled by default, which routes every call
/// to the offline dummy provider.
///
/// # Example
///
/// ```toml
/// [providers.anthropic]
/// enabled = true
/// api_key_env = "ANTHROPIC_API_KEY"
///
/// [providers.xai]
/// enabled = true
/// base_url = "https://api.x.ai"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileAnthropicConfig,
    pub openai: FileOpenAiConfig,
    pub xai: FileXaiConfig,
}

impl FileProvidersConfig {
    pub fn is_enabled(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Anthropic => self.anthropic.enabled,
            ProviderKind::OpenAi => self.openai.enabled,
            ProviderKind::Xai => self.xai.enabled,
            ProviderKind::Dummy => true,
        }
    }

    /// `(provider, api_key_env)` for every enabled external provider
    pub fn enabled_credentials(&self) -> Vec<(ProviderKind, &str)> {
        [
            (ProviderKind::Anthropic, self.anthropic.enabled, &self.anthropic.api_key_env),
            (ProviderKind::OpenAi, self.openai.enabled, &self.openai.api_key_env),
            (ProviderKind::Xai, self.xai.enabled, &self.xai.api_key_env),
        ]
        .into_iter()
        .filter(|(_, enabled, _)| *enabled)
        .map(|(kind, _, env)| (kind, env.as_str()))
        .collect()
    }

    /// Warn about enabled providers whose credential variable is unset.
    pub fn credential_issues(&self, env: &dyn Fn(&str) -> Option<String>) -> Vec<ConfigIssue> {
        self.enabled_credentials()
            .into_iter()
            .filter(|(_, var)| env(var).is_none_or(|v| v.trim().is_empty()))
            .map(|(provider, var)| {
                ConfigIssue::warning(
                    ConfigIssueCode::MissingCredential {
                        provider: provider.to_string(),
                        env_var: var.to_string(),
                    },
                    format!(
                        "providers.{provider}: {var} is not set; calls will fall back to the dummy provider"
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_disabled_by_default() {
        let config = FileProvidersConfig::default();
        assert!(config.enabled_credentials().is_empty());
        assert!(config.is_enabled(ProviderKind::Dummy));
        assert!(!config.is_enabled(ProviderKind::OpenAi));
    }

    #[test]
    fn test_missing_credential_is_warning() {
        let toml_str = r#"
[xai]
enabled = true

[anthropic]
enabled = true
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.xai.base_url, "https://api.x.ai");

        let env = |name: &str| (name == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string());
        let issues = config.credential_issues(&env);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::MissingCredential { env_var, .. } if env_var == "XAI_API_KEY"
        ));
    }
}
