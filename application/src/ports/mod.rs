//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod config_source;
pub mod generative_client;
pub mod master;
pub mod progress;
pub mod run_recorder;
pub mod token_estimator;
