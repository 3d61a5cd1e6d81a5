//! Responder output: parsed or degraded.
//!
//! Responder text is parsed into [`AgentReport`] when possible. Anything
//! else becomes an explicit [`DegradedReport`] carrying the raw text and the
//! marker scores, so a bad responder never fails the request.

use super::markers::{Markers, extract_assumptions};
use super::report::AgentReport;
use crate::core::string::{clamp01, json_object_span, prefix_chars};
use crate::orchestration::role::Role;
use serde::{Deserialize, Serialize};

/// Characters of raw text kept as summary/reasoning of a degraded report
pub const DEGRADED_SNIPPET_CHARS: usize = 500;

/// Placeholder values used when a responder never answers
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.2;
pub const PLACEHOLDER_RISK: f64 = 0.7;
pub const PLACEHOLDER_TEXT: &str = "Agent failed to respond in time.";

/// Why a degraded report was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeCause {
    /// Text arrived but did not match the schema
    Malformed,
    /// The call timed out or failed
    Unavailable(String),
}

/// Fallback payload synthesized from unparseable or missing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedReport {
    pub report: AgentReport,
    pub raw_text: String,
    pub confidence: f64,
    pub risk: f64,
    pub cause: DegradeCause,
}

/// A responder's output as the scorer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponderOutput {
    Parsed { report: AgentReport, raw_text: String },
    Degraded(DegradedReport),
}

impl ResponderOutput {
    /// Parse raw responder text for `role`.
    pub fn from_text(role: Role, text: &str) -> Self {
        match parse_report(text) {
            Some(report) => ResponderOutput::Parsed {
                report,
                raw_text: text.to_string(),
            },
            None => {
                let markers = Markers::extract(text);
                ResponderOutput::Degraded(degrade(
                    role,
                    text,
                    markers.confidence,
                    markers.risk,
                    DegradeCause::Malformed,
                ))
            }
        }
    }

    /// Fixed low-confidence, high-risk output for a role that never answered.
    pub fn placeholder(role: Role, reason: impl Into<String>) -> Self {
        ResponderOutput::Degraded(degrade(
            role,
            PLACEHOLDER_TEXT,
            PLACEHOLDER_CONFIDENCE,
            PLACEHOLDER_RISK,
            DegradeCause::Unavailable(reason.into()),
        ))
    }

    pub fn report(&self) -> &AgentReport {
        match self {
            ResponderOutput::Parsed { report, .. } => report,
            ResponderOutput::Degraded(degraded) => &degraded.report,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            ResponderOutput::Parsed { raw_text, .. } => raw_text,
            ResponderOutput::Degraded(degraded) => &degraded.raw_text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ResponderOutput::Degraded(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            ResponderOutput::Degraded(DegradedReport {
                cause: DegradeCause::Unavailable(_),
                ..
            })
        )
    }

    /// Text the merger extracts units from
    pub fn merge_content(&self) -> String {
        match self {
            ResponderOutput::Parsed { report, .. } => report.to_content(),
            ResponderOutput::Degraded(degraded) => degraded.raw_text.trim().to_string(),
        }
    }

    /// Assumptions for the reply ledger
    pub fn assumptions(&self) -> Vec<String> {
        match self {
            ResponderOutput::Parsed { report, .. } => report.assumptions.clone(),
            ResponderOutput::Degraded(degraded) => extract_assumptions(&degraded.raw_text),
        }
    }
}

/// One role's result for an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub role: Role,
    pub output: ResponderOutput,
    pub duration_ms: u64,
}

impl AgentOutput {
    pub fn new(role: Role, output: ResponderOutput, duration_ms: u64) -> Self {
        Self {
            role,
            output,
            duration_ms,
        }
    }
}

fn parse_report(text: &str) -> Option<AgentReport> {
    let slice = json_object_span(text)?;
    let report: AgentReport = serde_json::from_str(slice).ok()?;
    report.validate().ok()?;
    Some(report)
}

fn degrade(role: Role, text: &str, confidence: f64, risk: f64, cause: DegradeCause) -> DegradedReport {
    let snippet = prefix_chars(text.trim(), DEGRADED_SNIPPET_CHARS).to_string();
    let note = match &cause {
        DegradeCause::Malformed => "Malformed output: responder did not follow the JSON schema".to_string(),
        DegradeCause::Unavailable(reason) => format!("No output: {reason}"),
    };
    DegradedReport {
        report: AgentReport {
            agent: role.as_str().to_string(),
            answer_summary: if snippet.is_empty() { Vec::new() } else { vec![snippet.clone()] },
            reasoning: snippet,
            failure_modes: vec![note],
            self_confidence: clamp01(confidence),
            ..Default::default()
        },
        raw_text: text.to_string(),
        confidence,
        risk,
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"Here you go:
```json
{"agent":"solver","answerSummary":["s1","s2"],"assumptions":["A1"],"reasoning":"because",
 "stepsOrDeliverables":[],"failureModes":["f"],"units":[{"id":"u1","topic":"t","text":"claim","tags":[]}],
 "selfConfidence":0.6}
```"#;

    #[test]
    fn test_parses_fenced_json() {
        let output = ResponderOutput::from_text(Role::Solver, VALID_JSON);
        assert!(!output.is_degraded());
        assert_eq!(output.report().answer_summary.len(), 2);
        assert_eq!(output.assumptions(), vec!["A1".to_string()]);
        assert_eq!(output.merge_content(), "- claim");
    }

    #[test]
    fn test_prose_degrades_with_markers() {
        let text = "### Answer Summary\n- do the thing\nConfidence score: 0.4\nRisk score: 0.4";
        let output = ResponderOutput::from_text(Role::Critic, text);
        let ResponderOutput::Degraded(degraded) = &output else {
            panic!("expected degraded");
        };
        assert_eq!(degraded.confidence, 0.4);
        assert_eq!(degraded.risk, 0.4);
        assert_eq!(degraded.cause, DegradeCause::Malformed);
        assert_eq!(degraded.report.failure_modes.len(), 1);
        assert!(degraded.report.assumptions.is_empty());
        assert_eq!(output.merge_content(), text);
    }

    #[test]
    fn test_invalid_schema_degrades() {
        let text = r#"{"agent":"solver","selfConfidence":2.0}"#;
        assert!(ResponderOutput::from_text(Role::Solver, text).is_degraded());
    }

    #[test]
    fn test_snippet_is_bounded() {
        let long = "x".repeat(2000);
        let output = ResponderOutput::from_text(Role::Grok, &long);
        assert_eq!(output.report().reasoning.chars().count(), DEGRADED_SNIPPET_CHARS);
        assert_eq!(output.raw_text().len(), 2000);
    }

    #[test]
    fn test_placeholder_values() {
        let output = ResponderOutput::placeholder(Role::Verifier, "timed out after 15000ms");
        let ResponderOutput::Degraded(degraded) = &output else {
            panic!("expected degraded");
        };
        assert!(output.is_placeholder());
        assert_eq!(degraded.confidence, PLACEHOLDER_CONFIDENCE);
        assert_eq!(degraded.risk, PLACEHOLDER_RISK);
        assert_eq!(degraded.raw_text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_empty_text_degrades_without_summary() {
        let output = ResponderOutput::from_text(Role::Solver, "   ");
        assert!(output.report().answer_summary.is_empty());
    }
}
