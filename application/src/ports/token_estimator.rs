//! Token estimation port
//!
//! Used by budget allocation before any responder runs. Estimation is
//! best-effort: callers substitute the role's `max_tokens` on failure.

use super::generative_client::GatewayError;
use async_trait::async_trait;
use roundtable_domain::{Message, ModelSpec};

#[async_trait]
pub trait TokenEstimator: Send + Sync {
    /// Estimated total tokens for sending `messages` to `model`
    async fn estimate(&self, model: &ModelSpec, messages: &[Message]) -> Result<u32, GatewayError>;
}

/// Estimator that always fails, so every role is budgeted at its `max_tokens`.
pub struct MaxTokensEstimator;

#[async_trait]
impl TokenEstimator for MaxTokensEstimator {
    async fn estimate(&self, _model: &ModelSpec, _messages: &[Message]) -> Result<u32, GatewayError> {
        Err(GatewayError::Unsupported("token counting".to_string()))
    }
}
