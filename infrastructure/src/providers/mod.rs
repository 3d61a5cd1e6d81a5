//! Generative model providers
//!
//! Each provider speaks one wire format. [`routing::RoutingGateway`] picks
//! the adapter named by the request's model and implements the application
//! ports on top of them.

pub mod anthropic;
pub mod dummy;
mod http;
pub mod openai_compat;
pub mod routing;

use async_trait::async_trait;
use roundtable_application::{GatewayError, GenerationRequest};
use roundtable_domain::{Message, ModelSpec, ProviderKind};

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Send one request and return the model's text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;

    /// Count input tokens for `messages`. Not every provider can.
    async fn count_tokens(
        &self,
        _model: &ModelSpec,
        _messages: &[Message],
    ) -> Result<u32, GatewayError> {
        Err(GatewayError::Unsupported(format!(
            "token counting on {}",
            self.kind()
        )))
    }
}
