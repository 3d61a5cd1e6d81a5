//! Core domain concepts shared across all subdomains.
//!
//! - [`request::ChatRequest`]: a validated inbound request
//! - [`model::ModelSpec`]: provider/model assignment for one call
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod request;
pub mod string;
