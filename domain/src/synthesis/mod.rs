//! Planning, synthesis and confidence for audit/deep requests.

pub mod confidence;
pub mod draft;
pub mod guardrails;
pub mod plan;
