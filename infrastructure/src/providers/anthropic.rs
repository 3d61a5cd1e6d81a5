//! Anthropic Messages API adapter with token counting.

use super::ProviderAdapter;
use super::http::{ApiKey, endpoint, post_json};
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use roundtable_application::{GatewayError, GenerationRequest};
use roundtable_domain::{Message, MessageRole, ModelSpec, ProviderKind};
use serde_json::{Map, Value, json};
use tracing::debug;

const MESSAGES_PATH: &str = "v1/messages";
const COUNT_TOKENS_PATH: &str = "v1/messages/count_tokens";

pub struct AnthropicProvider {
    base_url: String,
    api_version: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: &FileAnthropicConfig) -> Self {
        Self::with_key(config, ApiKey::from_env(&config.api_key_env))
    }

    fn with_key(config: &FileAnthropicConfig, api_key: ApiKey) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// System messages are joined into the top-level `system` field; the rest
    /// stay in order.
    fn conversation(messages: &[Message]) -> Map<String, Value> {
        let system = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let turns: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut payload = Map::new();
        if !system.trim().is_empty() {
            payload.insert("system".to_string(), Value::String(system.trim().to_string()));
        }
        payload.insert("messages".to_string(), Value::Array(turns));
        payload
    }

    fn build_body(request: &GenerationRequest) -> Value {
        let mut payload = Self::conversation(&request.messages);
        payload.insert("model".to_string(), json!(request.model.model));
        payload.insert("max_tokens".to_string(), json!(request.max_tokens));
        payload.insert("temperature".to_string(), json!(request.temperature));
        Value::Object(payload)
    }

    fn build_count_body(model: &ModelSpec, messages: &[Message]) -> Value {
        let mut payload = Self::conversation(messages);
        payload.insert("model".to_string(), json!(model.model));
        Value::Object(payload)
    }

    /// Text blocks of the response, concatenated
    fn parse_text(response: &Value) -> Result<String, GatewayError> {
        let blocks = response
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("anthropic: response has no content".to_string())
            })?;
        Ok(blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect())
    }

    fn request(&self, path: &str) -> Result<reqwest::RequestBuilder, GatewayError> {
        let api_key = self.api_key.require(ProviderKind::Anthropic)?;
        Ok(self
            .client
            .post(endpoint(&self.base_url, path))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version))
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        debug!(model = %request.model.model, "anthropic messages call");
        let http_request = self.request(MESSAGES_PATH)?;
        let response =
            post_json(ProviderKind::Anthropic, http_request, &Self::build_body(request)).await?;
        Self::parse_text(&response)
    }

    async fn count_tokens(
        &self,
        model: &ModelSpec,
        messages: &[Message],
    ) -> Result<u32, GatewayError> {
        let http_request = self.request(COUNT_TOKENS_PATH)?;
        let response = post_json(
            ProviderKind::Anthropic,
            http_request,
            &Self::build_count_body(model, messages),
        )
        .await?;
        response
            .get("input_tokens")
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("anthropic: count has no input_tokens".to_string())
            })
    }
}
