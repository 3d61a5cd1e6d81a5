//! Prompt domain
//!
//! Messages and templates for responder, planner, synthesizer and polish calls.

pub mod message;
mod template;

pub use message::{Message, MessageRole};
pub use template::{PromptContext, PromptTemplate};
