//! Responder roles.
//!
//! [`Role`] is a closed enumeration. Every per-role table in the crate
//! (weights, priorities, overrides, model assignments) is keyed through
//! [`RoleTable`](super::role_table::RoleTable) or an exhaustive `match`, so
//! adding a role is a compile-checked change.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed specialist persona invoked at most once per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Produces the primary answer
    Solver,
    /// Hunts for flaws in the likely answer
    Critic,
    /// Checks claims and assumptions
    Verifier,
    /// Turns the answer into concrete implementation steps
    Impl,
    /// Reads image attachments
    Visual,
    /// Designs prompts and rubrics
    Promptsmith,
    /// Contrarian second opinion
    Grok,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Solver,
        Role::Critic,
        Role::Verifier,
        Role::Impl,
        Role::Visual,
        Role::Promptsmith,
        Role::Grok,
    ];

    /// The role set used whenever nothing more specific applies
    pub const TRIAD: [Role; 3] = [Role::Solver, Role::Critic, Role::Verifier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Solver => "solver",
            Role::Critic => "critic",
            Role::Verifier => "verifier",
            Role::Impl => "impl",
            Role::Visual => "visual",
            Role::Promptsmith => "promptsmith",
            Role::Grok => "grok",
        }
    }

    /// Position in the budget trimming order; lower survives longer.
    pub fn priority(&self) -> u8 {
        match self {
            Role::Solver => 0,
            Role::Verifier => 1,
            Role::Critic => 2,
            Role::Impl => 3,
            Role::Promptsmith => 4,
            Role::Grok => 5,
            Role::Visual => 6,
        }
    }

    /// Uppercase tag used in merge unit ids and text suffixes
    pub fn tag(&self) -> String {
        self.as_str().to_uppercase()
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Solver => 0,
            Role::Critic => 1,
            Role::Verifier => 2,
            Role::Impl => 3,
            Role::Visual => 4,
            Role::Promptsmith => 5,
            Role::Grok => 6,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solver" => Ok(Role::Solver),
            "critic" => Ok(Role::Critic),
            "verifier" => Ok(Role::Verifier),
            "impl" | "implementer" => Ok(Role::Impl),
            "visual" => Ok(Role::Visual),
            "promptsmith" => Ok(Role::Promptsmith),
            "grok" => Ok(Role::Grok),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}
