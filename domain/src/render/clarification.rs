//! Clarification question used instead of an answer when confidence is low.

use crate::synthesis::plan::{ClarificationQuestion, Plan};

pub fn default_clarification() -> ClarificationQuestion {
    ClarificationQuestion {
        question: "Question".to_string(),
        options: vec![
            "Clarify the primary goal".to_string(),
            "Provide constraints or budget".to_string(),
            "Proceed with best-effort assumptions".to_string(),
        ],
    }
}

/// The plan's question when it has one, else the fixed default.
pub fn clarification_text(plan: Option<&Plan>) -> String {
    plan.and_then(|p| p.clarification_question.as_ref())
        .map(ClarificationQuestion::render)
        .unwrap_or_else(|| default_clarification().render())
}
