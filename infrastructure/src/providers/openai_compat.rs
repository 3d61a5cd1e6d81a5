//! OpenAI chat-completions adapter.
//!
//! Serves OpenAI itself and any endpoint speaking the same wire format
//! (xAI), selected by base URL.

use super::ProviderAdapter;
use super::http::{ApiKey, endpoint, post_json};
use crate::config::{FileOpenAiConfig, FileXaiConfig};
use async_trait::async_trait;
use roundtable_application::{GatewayError, GenerationRequest};
use roundtable_domain::ProviderKind;
use serde_json::{Value, json};
use tracing::debug;

const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

pub struct OpenAiCompatibleProvider {
    kind: ProviderKind,
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    pub fn openai(config: &FileOpenAiConfig) -> Self {
        Self::with_key(
            ProviderKind::OpenAi,
            &config.base_url,
            ApiKey::from_env(&config.api_key_env),
        )
    }

    pub fn xai(config: &FileXaiConfig) -> Self {
        Self::with_key(
            ProviderKind::Xai,
            &config.base_url,
            ApiKey::from_env(&config.api_key_env),
        )
    }

    fn with_key(kind: ProviderKind, base_url: &str, api_key: ApiKey) -> Self {
        Self {
            kind,
            base_url: base_url.to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn build_body(request: &GenerationRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": request.model.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    fn parse_text(kind: ProviderKind, response: &Value) -> Result<String, GatewayError> {
        response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("{kind}: response has no message content"))
            })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let api_key = self.api_key.require(self.kind)?;
        let url = endpoint(&self.base_url, CHAT_COMPLETIONS_PATH);
        debug!(provider = %self.kind, model = %request.model.model, "POST {}", url);

        let http_request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key));
        let response = post_json(self.kind, http_request, &Self::build_body(request)).await?;
        Self::parse_text(self.kind, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::Purpose;
    use roundtable_domain::{Message, ModelSpec, Role};

    fn request(json_mode: bool) -> GenerationRequest {
        let model = ModelSpec::new(ProviderKind::OpenAi, "gpt-4.1")
            .with_temperature(0.3)
            .with_max_tokens(900);
        let request = GenerationRequest::new(
            Purpose::Responder(Role::Solver),
            model,
            vec![Message::system("be brief"), Message::user("hi")],
        );
        if json_mode { request.with_json_mode() } else { request }
    }

    #[test]
    fn test_body_shape() {
        let body = OpenAiCompatibleProvider::build_body(&request(true));
        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["max_tokens"], 900);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["response_format"]["type"], "json_object");

        let plain = OpenAiCompatibleProvider::build_body(&request(false));
        assert!(plain.get("response_format").is_none());
    }

    #[test]
    fn test_parse_text() {
        let response = json!({ "choices": [{ "message": { "role": "assistant", "content": "hello" } }] });
        assert_eq!(
            OpenAiCompatibleProvider::parse_text(ProviderKind::Xai, &response).unwrap(),
            "hello"
        );
        assert!(matches!(
            OpenAiCompatibleProvider::parse_text(ProviderKind::Xai, &json!({ "choices": [] })),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = OpenAiCompatibleProvider::with_key(
            ProviderKind::OpenAi,
            "http://127.0.0.1:9",
            ApiKey::from_env("ROUNDTABLE_TEST_UNSET_OPENAI_KEY"),
        );
        let result = provider.generate(&request(false)).await;
        assert!(matches!(result, Err(GatewayError::MissingCredential { .. })));
    }
}
