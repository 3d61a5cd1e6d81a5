//! Execution parameters: dispatcher and retry loop control.
//!
//! [`ExecutionParams`] groups the static parameters that bound how much work
//! one request may do. These are application-layer concerns, not domain
//! policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard ceiling on audit/deep attempts per request
pub const MAX_ATTEMPTS: u8 = 3;

/// Dispatcher and retry loop limits.
///
/// | Field | Bounds |
/// |-------|--------|
/// | `concurrency` | responder calls in flight at once |
/// | `request_timeout` | each call, independently |
/// | `max_attempts` | audit/deep dispatch-score-synthesize cycles, 1..=[`MAX_ATTEMPTS`] |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub max_attempts: u8,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            concurrency: 2,
            request_timeout: Duration::from_millis(15_000),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts.clamp(1, MAX_ATTEMPTS);
        self
    }
}
