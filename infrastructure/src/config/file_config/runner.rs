//! Runner configuration from TOML (`[runner]` section)

use roundtable_application::config::{ExecutionParams, MAX_ATTEMPTS};
use roundtable_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatcher and retry loop limits.
///
/// # Example
///
/// ```toml
/// [runner]
/// concurrency = 2
/// request_timeout_ms = 15000
/// max_attempts = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunnerConfig {
    pub concurrency: usize,
    pub request_timeout_ms: u64,
    pub max_attempts: u8,
}

impl Default for FileRunnerConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            concurrency: params.concurrency,
            request_timeout_ms: params.request_timeout.as_millis() as u64,
            max_attempts: params.max_attempts,
        }
    }
}

impl FileRunnerConfig {
    /// Convert to [`ExecutionParams`], returning validation issues.
    ///
    /// Zero values and more than [`MAX_ATTEMPTS`] attempts are errors; the
    /// returned params are clamped either way.
    pub fn to_execution_params(&self) -> (ExecutionParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        for (field, value) in [
            ("concurrency", self.concurrency as f64),
            ("request_timeout_ms", self.request_timeout_ms as f64),
            ("max_attempts", self.max_attempts as f64),
        ] {
            if value < 1.0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: format!("runner.{field}"),
                        value,
                    },
                    format!("runner.{field}: must be at least 1"),
                ));
            }
        }

        if self.max_attempts > MAX_ATTEMPTS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "runner.max_attempts".to_string(),
                    value: self.max_attempts as f64,
                },
                format!("runner.max_attempts: at most {MAX_ATTEMPTS}"),
            ));
        }

        let params = ExecutionParams::default()
            .with_concurrency(self.concurrency)
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms.max(1)))
            .with_max_attempts(self.max_attempts);
        (params, issues)
    }
}
