//! Configuration value objects shared across layers

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
