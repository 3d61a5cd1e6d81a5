//! Offline provider with deterministic output.
//!
//! Used when no external provider is configured and as the fallback for
//! failed calls. The text carries the low-confidence marker so the scorer
//! treats it as a weak, degraded answer.

use super::ProviderAdapter;
use async_trait::async_trait;
use roundtable_application::{GatewayError, GenerationRequest};
use roundtable_domain::{Message, ModelSpec, ProviderKind};

pub struct DummyProvider;

impl DummyProvider {
    /// Deterministic reply for `messages`
    pub fn reply(messages: &[Message]) -> String {
        let serialized = serde_json::to_string(messages).unwrap_or_default();
        [
            "TL;DR: No external model configured.".to_string(),
            String::new(),
            "Main answer:".to_string(),
            "- No provider is enabled or configured; cannot produce a model-based response."
                .to_string(),
            String::new(),
            "Assumptions ledger:".to_string(),
            "- Caller accepts deterministic dummy responses when providers are unavailable."
                .to_string(),
            String::new(),
            format!("Confidence score: 0.10 (dummy:{})", fingerprint(&serialized)),
        ]
        .join("\n")
    }
}

/// `hash * 31 + unit` over UTF-16 code units, as 8 hex digits
fn fingerprint(input: &str) -> String {
    let hash = input
        .encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)));
    format!("{hash:08x}")
}

#[async_trait]
impl ProviderAdapter for DummyProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Dummy
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        Ok(Self::reply(&request.messages))
    }

    async fn count_tokens(
        &self,
        _model: &ModelSpec,
        _messages: &[Message],
    ) -> Result<u32, GatewayError> {
        Ok(0)
    }
}
