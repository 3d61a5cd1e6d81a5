//! Chat request value object

use crate::core::error::DomainError;
use crate::orchestration::mode::Mode;
use serde::{Deserialize, Serialize};

/// Who sent the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Metadata for a file attached to a request
///
/// Front ends disagree on field names, so both `name`/`filename` and
/// `type`/`contentType` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, alias = "filename", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "contentType",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content_type: Some(content_type.into()),
            url: None,
        }
    }

    /// `image/*` or a bare `image` type
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|t| t.starts_with("image/") || t == "image")
    }
}

/// One inbound chat request (Value Object)
///
/// Constructed through [`ChatRequest::try_new`] so that an empty message can
/// never reach the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub source: String,
    pub mode: Mode,
    pub user: ChatUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ChatRequest {
    /// Create a validated request
    pub fn try_new(
        source: impl Into<String>,
        mode: Mode,
        user: ChatUser,
        message: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainError::InvalidRequest("message cannot be empty".to_string()));
        }
        if user.id.trim().is_empty() {
            return Err(DomainError::InvalidRequest("user.id cannot be empty".to_string()));
        }
        Ok(Self {
            source: source.into(),
            mode,
            user,
            context: None,
            message,
            attachments: Vec::new(),
        })
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Re-check invariants on a request that came in through deserialization
    pub fn validate(&self) -> Result<(), DomainError> {
        Self::try_new(
            self.source.clone(),
            self.mode,
            self.user.clone(),
            self.message.clone(),
        )
        .map(|_| ())
    }
}
