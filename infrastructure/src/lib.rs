//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: provider gateways, the model-backed planner and
//! synthesizer, configuration file loading and the JSONL run recorder.

pub mod config;
pub mod logging;
pub mod master;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigStore, FileConfig, LoadedConfig};
pub use logging::JsonlRunRecorder;
pub use master::{ModelPlanner, ModelSynthesizer};
pub use providers::{ProviderAdapter, dummy::DummyProvider, routing::RoutingGateway};
