//! Structured configuration issues.
//!
//! Loaders collect every problem they find instead of stopping at the first
//! one, so an operator sees the whole list in a single startup attempt.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the process must not start serving with this configuration.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// A numeric field is outside its allowed range.
    OutOfRange { field: String, value: f64 },
    /// `tau_hard` must be strictly below `tau_soft`.
    ThresholdOrder { hard: f64, soft: f64 },
    /// A model field was present but empty.
    EmptyModelName { field: String },
    /// A string field could not be parsed into its enumeration.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A role has no model assignment after defaults are applied.
    MissingRoleModel { role: String },
    /// A provider is enabled but its credential variable is unset.
    MissingCredential { provider: String, env_var: String },
    /// A model assignment names a provider that is switched off.
    ProviderDisabled { field: String, provider: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Returns true if any issue is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warn = ConfigIssue::warning(
            ConfigIssueCode::MissingCredential {
                provider: "openai".into(),
                env_var: "OPENAI_API_KEY".into(),
            },
            "OPENAI_API_KEY is not set",
        );
        assert!(!has_errors(std::slice::from_ref(&warn)));

        let err = ConfigIssue::error(
            ConfigIssueCode::ThresholdOrder {
                hard: 0.7,
                soft: 0.6,
            },
            "policy.tau_hard must be below policy.tau_soft",
        );
        assert!(has_errors(&[warn, err.clone()]));
        assert_eq!(
            err.to_string(),
            "error: policy.tau_hard must be below policy.tau_soft"
        );
    }
}
