//! Model value objects: which provider serves a call and with what settings

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Generative-model backends a role can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    Xai,
    /// Deterministic offline responder, also the fallback for failed calls
    #[default]
    Dummy,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Xai => "xai",
            ProviderKind::Dummy => "dummy",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            "xai" | "grok" => Ok(ProviderKind::Xai),
            "dummy" => Ok(ProviderKind::Dummy),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// A fully resolved model assignment for one role (or the master)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub provider: ProviderKind,
    /// Provider-side model identifier
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ModelSpec {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 1200,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Offline model used when nothing else is configured
    pub fn dummy() -> Self {
        Self::new(ProviderKind::Dummy, "dummy")
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for kind in [
            ProviderKind::Anthropic,
            ProviderKind::OpenAi,
            ProviderKind::Xai,
            ProviderKind::Dummy,
        ] {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("grok".parse::<ProviderKind>().unwrap(), ProviderKind::Xai);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_model_spec_display() {
        let spec = ModelSpec::new(ProviderKind::Anthropic, "claude-opus-4-5").with_max_tokens(900);
        assert_eq!(spec.to_string(), "anthropic:claude-opus-4-5");
        assert_eq!(spec.max_tokens, 900);
    }

    #[test]
    fn test_provider_serde() {
        let json = serde_json::to_string(&ProviderKind::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
    }
}
