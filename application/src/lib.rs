//! Application layer for roundtable
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, FeatureFlags, OrchestrationConfig, PolicyConfig, RoleModels};
pub use ports::{
    config_source::{ConfigSource, StaticConfig},
    generative_client::{GatewayError, Generation, GenerationRequest, GenerativeClient, Purpose},
    master::{PlanInput, Planner, SynthesisInput, Synthesizer},
    progress::{NoProgress, ProgressNotifier},
    run_recorder::{NoRunRecorder, RecordError, RunRecord, RunRecorder},
    token_estimator::{MaxTokensEstimator, TokenEstimator},
};
pub use use_cases::dispatch::{AgentRequest, Dispatcher};
pub use use_cases::run_chat::{
    AuditTrail, BudgetMeta, ChatOutcome, ResponseMeta, RoleScore, RunChatError, RunChatUseCase,
};
pub use use_cases::shared::generate_with_timeout;
