//! Checks applied to a synthesis before it is accepted.

use crate::scoring::scorer::ScoredOutput;

pub const TIME_ESTIMATE_MARKER: &str = "Execution time estimate";

pub const DEFAULT_TIME_ESTIMATE: &str = "### Execution time estimate\n- Roughly 1-2 hours for a first pass; refine after the first deliverable is reviewed.";

/// Whether any responder proposed steps or deliverables.
pub fn has_plan(scored: &[ScoredOutput]) -> bool {
    scored
        .iter()
        .any(|item| item.output.report().has_deliverables())
}

pub fn has_time_estimate(reply_markdown: &str) -> bool {
    reply_markdown.contains(TIME_ESTIMATE_MARKER)
}

/// Append the default estimate section unless one is already present.
pub fn with_default_time_estimate(reply_markdown: &str) -> String {
    if has_time_estimate(reply_markdown) {
        return reply_markdown.to_string();
    }
    format!("{}\n\n{}", reply_markdown.trim_end(), DEFAULT_TIME_ESTIMATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_time_estimate() {
        assert!(has_time_estimate("## Plan\n### Execution time estimate\n- 2 days"));
        assert!(!has_time_estimate("## Plan\n- step"));
    }

    #[test]
    fn test_default_appended_once() {
        let patched = with_default_time_estimate("## Plan\n- step\n");
        assert!(patched.ends_with("reviewed."));
        assert!(patched.starts_with("## Plan\n- step\n\n### Execution"));
        assert_eq!(with_default_time_estimate(&patched), patched);
    }
}
