//! Input/output types for the run-chat use case.

use roundtable_domain::{
    BudgetDecision, DomainError, Invalidation, MergeUnit, Mode, Plan, Role, ScoredOutput, Status,
    SynthesisAudit, TaskCategory,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that stop a request before any responder runs.
///
/// Provider, planner and synthesizer failures are not errors: they degrade
/// the result instead.
#[derive(Error, Debug)]
pub enum RunChatError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("No roles enabled for {category} in {mode} mode")]
    NoRolesEnabled { category: TaskCategory, mode: Mode },
}

/// Budget section of the response metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetMeta {
    pub cap_usd: f64,
    pub estimated_usd: f64,
    pub mode_cap_exceeded: bool,
}

impl From<&BudgetDecision> for BudgetMeta {
    fn from(decision: &BudgetDecision) -> Self {
        Self {
            cap_usd: decision.cap_usd,
            estimated_usd: decision.estimated_cost_usd,
            mode_cap_exceeded: decision.mode_cap_exceeded(),
        }
    }
}

/// Metadata carried next to every reply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub task_type: TaskCategory,
    #[serde(rename = "c_final")]
    pub c_final: f64,
    pub budget: BudgetMeta,
    pub used_agents: Vec<Role>,
    pub invalidation: Invalidation,
    pub attempts: u8,
    /// The reply is a clarification question rather than an answer
    pub clarification: bool,
}

/// Per-role score line of the audit trail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleScore {
    pub role: Role,
    pub credibility: f64,
    pub status: Status,
    pub weighted_score: f64,
    pub duration_ms: u64,
    pub degraded: bool,
}

impl From<&ScoredOutput> for RoleScore {
    fn from(scored: &ScoredOutput) -> Self {
        Self {
            role: scored.role,
            credibility: scored.credibility,
            status: scored.status,
            weighted_score: scored.weighted_score,
            duration_ms: scored.duration_ms,
            degraded: scored.output.is_degraded(),
        }
    }
}

/// Structured audit data for audit/deep responses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrail {
    pub plan: Plan,
    /// Weights after discarded roles are removed and the rest renormalized
    pub weights: BTreeMap<Role, f64>,
    pub scores: Vec<RoleScore>,
    pub units_used: Vec<String>,
    pub quarantined: Vec<MergeUnit>,
    pub disagreements: Vec<MergeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<SynthesisAudit>,
}

/// Result of one chat request
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub meta: ResponseMeta,
    /// Present for audit and deep requests
    pub audit: Option<AuditTrail>,
    /// Identifier of the persisted run, when recording succeeded
    pub run_id: Option<String>,
}
