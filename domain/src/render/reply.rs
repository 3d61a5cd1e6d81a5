//! User-facing reply assembly.

use crate::merge::unit::MergeUnit;

const TLDR_UNITS: usize = 3;
const NO_ASSUMPTIONS: &str = "No assumptions provided by agents.";

/// Everything the renderer needs; optional parts are omitted when absent.
#[derive(Debug, Clone, Copy)]
pub struct ReplyInput<'a> {
    pub merged_units: &'a [MergeUnit],
    pub assumptions: &'a [String],
    pub confidence: f64,
    pub disagreements: &'a [MergeUnit],
    pub units_used: Option<&'a [String]>,
    /// Rewrite of the merged units that replaces the bullet list
    pub polished: Option<&'a str>,
    pub audit_appendix: Option<&'a str>,
}

impl<'a> ReplyInput<'a> {
    pub fn new(merged_units: &'a [MergeUnit], assumptions: &'a [String], confidence: f64) -> Self {
        Self {
            merged_units,
            assumptions,
            confidence,
            disagreements: &[],
            units_used: None,
            polished: None,
            audit_appendix: None,
        }
    }
}

fn bullet(text: &str) -> String {
    format!("- {text}")
}

/// Render the reply.
///
/// Layout: TL;DR (top three units), main answer, assumptions ledger,
/// confidence line, then units used, disagreements and the audit appendix
/// when present. Empty lines are dropped.
pub fn render_reply(input: &ReplyInput<'_>) -> String {
    let mut lines: Vec<String> = vec!["TL;DR".to_string()];
    lines.extend(input.merged_units.iter().take(TLDR_UNITS).map(|u| bullet(&u.text)));

    lines.push("Main answer".to_string());
    match input.polished.map(str::trim).filter(|p| !p.is_empty()) {
        Some(polished) => lines.push(polished.to_string()),
        None => lines.extend(input.merged_units.iter().map(|u| bullet(&u.text))),
    }

    lines.push("Assumptions ledger".to_string());
    if input.assumptions.is_empty() {
        lines.push(bullet(NO_ASSUMPTIONS));
    } else {
        lines.extend(input.assumptions.iter().map(|a| bullet(a)));
    }

    lines.push(format!("Confidence score: {:.2}", input.confidence));

    if let Some(ids) = input.units_used
        && !ids.is_empty()
    {
        lines.push(format!("Units used: {}", ids.join(", ")));
    }

    if !input.disagreements.is_empty() {
        lines.push("Disagreements".to_string());
        lines.extend(input.disagreements.iter().map(|u| bullet(&u.text)));
    }

    if let Some(appendix) = input.audit_appendix {
        lines.push(appendix.to_string());
    }

    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
