//! Port for persisting completed runs.
//!
//! Separate from `tracing`: tracing carries diagnostics, while a run record
//! is the full machine-readable account of one request (JSONL in the
//! default adapter). Recording failures never block the reply.

use crate::use_cases::run_chat::ResponseMeta;
use roundtable_domain::{ChatRequest, Plan, ScoredOutput};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything worth keeping about one completed request
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord<'a> {
    pub request: &'a ChatRequest,
    pub plan: Option<&'a Plan>,
    pub scored: &'a [ScoredOutput],
    pub reply: &'a str,
    pub meta: &'a ResponseMeta,
}

pub trait RunRecorder: Send + Sync {
    /// Persist a run, returning the generated run identifier.
    fn record(&self, record: &RunRecord<'_>) -> Result<String, RecordError>;
}

/// Recorder for tests and when persistence is disabled.
pub struct NoRunRecorder;

impl RunRecorder for NoRunRecorder {
    fn record(&self, _record: &RunRecord<'_>) -> Result<String, RecordError> {
        Ok(String::new())
    }
}
