//! Planner and synthesizer ports
//!
//! Both collaborators are model-backed in production. Adapters are expected
//! to validate and repair what the model returns; an `Err` tells the use case
//! to fall back to a deterministic plan or synthesis.

use super::generative_client::GatewayError;
use async_trait::async_trait;
use roundtable_domain::{ChatRequest, MergeResult, Plan, ScoredOutput, Synthesis, TaskCategory};

/// Input for planning an audit/deep request
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub request: &'a ChatRequest,
    /// Category from the local classifier, used when the planner's is unusable
    pub hint: TaskCategory,
}

#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, input: PlanInput<'_>) -> Result<Plan, GatewayError>;
}

/// Input for one synthesis call
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub request: &'a ChatRequest,
    pub plan: &'a Plan,
    pub category: TaskCategory,
    pub scored: &'a [ScoredOutput],
    pub merge: &'a MergeResult,
    pub ask_threshold: f64,
    /// Set on the regeneration pass that must include a time estimate
    pub require_time_estimate: bool,
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, input: SynthesisInput<'_>) -> Result<Synthesis, GatewayError>;
}
