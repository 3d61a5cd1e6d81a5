//! Response bodies of the chat API

use roundtable_application::{AuditTrail, ChatOutcome, ResponseMeta};
use serde::Serialize;

/// Body of every `/api/chat` response.
///
/// Error responses carry only `reply`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponseBody {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditTrail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl ChatResponseBody {
    pub fn message(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            meta: None,
            audit: None,
            run_id: None,
        }
    }
}

impl From<ChatOutcome> for ChatResponseBody {
    fn from(outcome: ChatOutcome) -> Self {
        Self {
            reply: outcome.reply,
            meta: Some(outcome.meta),
            audit: outcome.audit,
            run_id: outcome.run_id,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthBody {
    pub ok: bool,
}
