//! Reply rendering: answer text, audit appendix, clarification question.

pub mod audit;
pub mod clarification;
pub mod reply;
