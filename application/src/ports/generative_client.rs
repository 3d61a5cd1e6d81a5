//! Generative client port
//!
//! Defines the interface for a single call to a generative model.

use async_trait::async_trait;
use roundtable_domain::{Message, ModelSpec, ProviderKind, Role};
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during a generative call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Provider {provider} returned status {status}: {body}")]
    HttpStatus {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("Provider disabled: {0}")]
    ProviderDisabled(ProviderKind),

    #[error("Missing credential {env_var} for {provider}")]
    MissingCredential {
        provider: ProviderKind,
        env_var: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Cancellation and timeouts are decided by the caller, not the provider
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GatewayError::Cancelled | GatewayError::Timeout)
    }
}

/// What a call is for; used in logs and for provider-side routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    Responder(Role),
    Planner,
    Synthesizer,
    Polish,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Responder(role) => write!(f, "responder:{}", role),
            Purpose::Planner => write!(f, "planner"),
            Purpose::Synthesizer => write!(f, "synthesizer"),
            Purpose::Polish => write!(f, "polish"),
        }
    }
}

/// One generative call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub purpose: Purpose,
    pub model: ModelSpec,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response when it supports it
    pub json_mode: bool,
}

impl GenerationRequest {
    /// Request using the model's own temperature and token limit.
    pub fn new(purpose: Purpose, model: ModelSpec, messages: Vec<Message>) -> Self {
        Self {
            purpose,
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            model,
            messages,
            json_mode: false,
        }
    }

    pub fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Text returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Provider that actually answered (differs from the request after a fallback)
    pub provider: ProviderKind,
}

impl Generation {
    pub fn new(text: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            text: text.into(),
            provider,
        }
    }
}

/// Gateway for generative calls
///
/// Implementations live in the infrastructure layer. They must return
/// promptly with [`GatewayError::Cancelled`] once `cancel` fires.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<Generation, GatewayError>;
}
