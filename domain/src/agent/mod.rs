//! Responder outputs
//!
//! - [`report::AgentReport`]: the structured JSON payload
//! - [`output::ResponderOutput`]: parsed or degraded, never an error
//! - [`markers`]: free-text confidence/risk/assumption extraction

pub mod markers;
pub mod output;
pub mod report;
