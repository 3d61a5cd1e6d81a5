//! Structured responder payload.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One atomic claim reported by a responder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUnit {
    pub id: String,
    pub topic: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The JSON shape responders are asked to produce.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReport {
    pub agent: String,
    pub answer_summary: Vec<String>,
    pub assumptions: Vec<String>,
    pub reasoning: String,
    pub steps_or_deliverables: Vec<String>,
    pub failure_modes: Vec<String>,
    pub units: Vec<ReportUnit>,
    pub self_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_evidence: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cues: Option<Vec<String>>,
}

impl AgentReport {
    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.agent.trim().is_empty() {
            return Err(DomainError::MalformedOutput("agent is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.self_confidence) {
            return Err(DomainError::MalformedOutput(format!(
                "selfConfidence {} outside [0, 1]",
                self.self_confidence
            )));
        }
        if let Some(unit) = self
            .units
            .iter()
            .find(|u| u.id.is_empty() || u.topic.is_empty() || u.text.is_empty())
        {
            return Err(DomainError::MalformedOutput(format!(
                "unit '{}' has an empty field",
                unit.id
            )));
        }
        Ok(())
    }

    /// Content handed to the merger: one bullet per unit, falling back to
    /// the summary bullets, then the reasoning.
    pub fn to_content(&self) -> String {
        let lines: Vec<&str> = if !self.units.is_empty() {
            self.units.iter().map(|u| u.text.as_str()).collect()
        } else {
            self.answer_summary.iter().map(String::as_str).collect()
        };
        if lines.is_empty() {
            return self.reasoning.trim().to_string();
        }
        lines
            .iter()
            .map(|line| format!("- {}", line.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_deliverables(&self) -> bool {
        !self.steps_or_deliverables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AgentReport {
        AgentReport {
            agent: "solver".to_string(),
            answer_summary: vec!["Use a queue".to_string()],
            self_confidence: 0.7,
            units: vec![ReportUnit {
                id: "u1".to_string(),
                topic: "design".to_string(),
                text: "Buffer writes behind a queue".to_string(),
                tags: vec![],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let mut report = sample();
        report.self_confidence = 1.5;
        assert!(report.validate().unwrap_err().is_malformed_output());
    }

    #[test]
    fn test_validate_rejects_empty_unit_text() {
        let mut report = sample();
        report.units[0].text.clear();
        assert!(report.validate().is_err());
    }

    #[test]
    fn test_to_content_prefers_units() {
        assert_eq!(sample().to_content(), "- Buffer writes behind a queue");
        let mut report = sample();
        report.units.clear();
        assert_eq!(report.to_content(), "- Use a queue");
        report.answer_summary.clear();
        report.reasoning = "  plain text  ".to_string();
        assert_eq!(report.to_content(), "plain text");
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "agent": "critic",
            "answerSummary": ["a"],
            "assumptions": [],
            "reasoning": "r",
            "stepsOrDeliverables": ["s"],
            "failureModes": [],
            "units": [],
            "selfConfidence": 0.4
        }"#;
        let report: AgentReport = serde_json::from_str(json).unwrap();
        assert!(report.has_deliverables());
        assert_eq!(report.self_confidence, 0.4);
    }
}
