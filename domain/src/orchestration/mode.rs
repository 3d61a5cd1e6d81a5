//! Request mode definitions.
//!
//! [`Mode`] is the single user-facing axis that decides how much scrutiny a
//! request gets:
//! - Ask: small role set, one attempt, answer or clarify
//! - Audit: full role set, planner + synthesizer, audit appendix
//! - Deep: like audit, with the larger cost cap and the optional polish pass

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a request is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single dispatch, minimal role set
    #[default]
    Ask,
    /// All roles, retry loop, audit appendix in the reply
    Audit,
    /// Audit plus the deep cost cap
    Deep,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ask => "ask",
            Mode::Audit => "audit",
            Mode::Deep => "deep",
        }
    }

    /// Audit and deep share the planner/synthesizer pipeline.
    pub fn is_thorough(&self) -> bool {
        matches!(self, Mode::Audit | Mode::Deep)
    }

    /// Whether the rendered reply carries the audit appendix
    pub fn includes_audit(&self) -> bool {
        self.is_thorough()
    }

    pub fn all() -> &'static [Mode] {
        &[Mode::Ask, Mode::Audit, Mode::Deep]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(Mode::Ask),
            "audit" => Ok(Mode::Audit),
            "deep" => Ok(Mode::Deep),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}
