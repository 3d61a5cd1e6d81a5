//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`PolicyConfig`]: cost caps, score thresholds, ask-user threshold, role overrides
//! - [`RoleModels`]: model assignment per role and for the master
//! - [`ExecutionParams`]: concurrency, per-call timeout, attempt limit
//! - [`OrchestrationConfig`]: the container a request reads as one snapshot

pub mod execution_params;
pub mod orchestration_config;
pub mod policy;
pub mod role_models;

pub use execution_params::{ExecutionParams, MAX_ATTEMPTS};
pub use orchestration_config::{FeatureFlags, OrchestrationConfig};
pub use policy::PolicyConfig;
pub use role_models::RoleModels;
