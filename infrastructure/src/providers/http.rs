//! Shared HTTP plumbing for provider adapters

use roundtable_application::GatewayError;
use roundtable_domain::ProviderKind;
use serde_json::Value;

/// Longest error body kept in a [`GatewayError::HttpStatus`]
const MAX_ERROR_BODY: usize = 4000;

/// Credential for a provider, read once at construction
#[derive(Clone)]
pub(crate) struct ApiKey {
    env_var: String,
    value: Option<String>,
}

impl ApiKey {
    pub(crate) fn from_env(env_var: impl Into<String>) -> Self {
        let env_var = env_var.into();
        let value = std::env::var(&env_var)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self { env_var, value }
    }

    #[cfg(test)]
    pub(crate) fn fixed(value: &str) -> Self {
        Self {
            env_var: "TEST_KEY".to_string(),
            value: Some(value.to_string()),
        }
    }

    pub(crate) fn require(&self, provider: ProviderKind) -> Result<&str, GatewayError> {
        self.value
            .as_deref()
            .ok_or_else(|| GatewayError::MissingCredential {
                provider,
                env_var: self.env_var.clone(),
            })
    }
}

/// POST `body` as JSON and decode a JSON response.
pub(crate) async fn post_json(
    provider: ProviderKind,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value, GatewayError> {
    let response = request
        .header("content-type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

    let status = response.status().as_u16();
    let body_text = response
        .text()
        .await
        .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(GatewayError::HttpStatus {
            provider,
            status,
            body: body_text.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    serde_json::from_str(&body_text)
        .map_err(|e| GatewayError::InvalidResponse(format!("{provider}: {e}")))
}

/// Join a base URL and an API path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
