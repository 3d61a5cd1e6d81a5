//! Orchestration plan produced by the planner, with deterministic repair.
//!
//! Planner output is untrusted. [`Plan::repair`] coerces whatever JSON came
//! back into a usable plan instead of rejecting it:
//!
//! | Field | Repair |
//! |-------|--------|
//! | `taskType` | unknown → classifier hint |
//! | `confidenceTarget` | clamped to `[0, 1]`, non-numeric → 0.7 |
//! | `rounds` | clamped into `{1, 2, 3}`, missing → 1 |
//! | `agentsToRun` | unknown roles dropped, empty → solver/critic/verifier |
//! | `clarificationQuestion` | dropped if the question is empty or has < 3 options |
//! | `expectedOutputShape` | unknown → request mode |

use crate::core::string::json_object_span;
use crate::orchestration::category::TaskCategory;
use crate::orchestration::mode::Mode;
use crate::orchestration::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CONFIDENCE_TARGET: f64 = 0.7;
const MIN_CLARIFICATION_OPTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl ClarificationQuestion {
    /// Render as `Question (choose A/B/C):` followed by lettered options.
    pub fn render(&self) -> String {
        let letters: Vec<char> = ('A'..='Z').take(self.options.len()).collect();
        let header = match letters.as_slice() {
            [] => self.question.clone(),
            _ => {
                let choice: Vec<String> = letters.iter().map(char::to_string).collect();
                format!("{} (choose {}):", self.question.trim_end_matches(':'), choice.join("/"))
            }
        };
        let mut lines = vec![header];
        lines.extend(
            letters
                .iter()
                .zip(&self.options)
                .map(|(letter, option)| format!("{letter}) {option}")),
        );
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub task_type: TaskCategory,
    pub needs_clarification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<ClarificationQuestion>,
    pub agents_to_run: Vec<Role>,
    pub rounds: u8,
    pub focus: Vec<String>,
    pub expected_output_shape: Mode,
    pub confidence_target: f64,
}

impl Plan {
    /// Plan used when the planner is unavailable or returned nothing usable.
    pub fn fallback(hint: TaskCategory, mode: Mode) -> Self {
        Self {
            task_type: hint,
            needs_clarification: false,
            clarification_question: None,
            agents_to_run: Role::TRIAD.to_vec(),
            rounds: 1,
            focus: Vec::new(),
            expected_output_shape: mode,
            confidence_target: DEFAULT_CONFIDENCE_TARGET,
        }
    }

    /// Extract a JSON object from planner text and repair it.
    pub fn from_planner_text(text: &str, hint: TaskCategory, mode: Mode) -> Self {
        json_object_span(text)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .map(|value| Self::repair(&value, hint, mode))
            .unwrap_or_else(|| Self::fallback(hint, mode))
    }

    /// Coerce arbitrary planner JSON into a valid plan.
    pub fn repair(value: &Value, hint: TaskCategory, mode: Mode) -> Self {
        let task_type = value
            .get("taskType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(hint);

        let confidence_target = value
            .get("confidenceTarget")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_CONFIDENCE_TARGET);

        let rounds = value
            .get("rounds")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .map(|v| v.round().clamp(1.0, 3.0) as u8)
            .unwrap_or(1);

        let mut agents_to_run: Vec<Role> = Vec::new();
        for role in string_list(value.get("agentsToRun"))
            .iter()
            .filter_map(|s| s.parse::<Role>().ok())
        {
            if !agents_to_run.contains(&role) {
                agents_to_run.push(role);
            }
        }
        if agents_to_run.is_empty() {
            agents_to_run = Role::TRIAD.to_vec();
        }

        let clarification_question = value.get("clarificationQuestion").and_then(|q| {
            let question = q.get("question")?.as_str()?.trim().to_string();
            let options: Vec<String> = string_list(q.get("options"))
                .into_iter()
                .filter(|o| o.trim().chars().count() >= 2)
                .collect();
            (!question.is_empty() && options.len() >= MIN_CLARIFICATION_OPTIONS)
                .then_some(ClarificationQuestion { question, options })
        });

        let expected_output_shape = value
            .get("expectedOutputShape")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(mode);

        Self {
            task_type,
            needs_clarification: value
                .get("needsClarification")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            clarification_question,
            agents_to_run,
            rounds,
            focus: string_list(value.get("focus"))
                .into_iter()
                .filter(|f| !f.trim().is_empty())
                .collect(),
            expected_output_shape,
            confidence_target,
        }
    }

    /// Short human-readable summary for audit records
    pub fn describe(&self) -> String {
        let agents: Vec<&str> = self.agents_to_run.iter().map(Role::as_str).collect();
        format!(
            "{} | agents: {} | rounds: {} | target: {:.2}",
            self.task_type,
            agents.join(", "),
            self.rounds,
            self.confidence_target
        )
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_plan_survives() {
        let value = json!({
            "taskType": "TECHNICAL_EXECUTION",
            "needsClarification": false,
            "agentsToRun": ["solver", "impl"],
            "rounds": 2,
            "focus": ["latency"],
            "expectedOutputShape": "deep",
            "confidenceTarget": 0.8
        });
        let plan = Plan::repair(&value, TaskCategory::VerbalReasoning, Mode::Audit);
        assert_eq!(plan.task_type, TaskCategory::TechnicalExecution);
        assert_eq!(plan.agents_to_run, vec![Role::Solver, Role::Impl]);
        assert_eq!(plan.rounds, 2);
        assert_eq!(plan.expected_output_shape, Mode::Deep);
        assert_eq!(plan.confidence_target, 0.8);
    }

    #[test]
    fn test_repairs_bad_fields() {
        let value = json!({
            "taskType": "ASTROLOGY",
            "agentsToRun": ["oracle", "wizard"],
            "rounds": 9,
            "confidenceTarget": "high",
            "expectedOutputShape": "verbose",
            "clarificationQuestion": {"question": "Which?", "options": ["A1", "B2"]}
        });
        let plan = Plan::repair(&value, TaskCategory::VisualAnalysis, Mode::Audit);
        assert_eq!(plan.task_type, TaskCategory::VisualAnalysis);
        assert_eq!(plan.agents_to_run, Role::TRIAD.to_vec());
        assert_eq!(plan.rounds, 3);
        assert_eq!(plan.confidence_target, DEFAULT_CONFIDENCE_TARGET);
        assert_eq!(plan.expected_output_shape, Mode::Audit);
        assert!(plan.clarification_question.is_none());
    }

    #[test]
    fn test_clamps_confidence_and_rounds() {
        let value = json!({"confidenceTarget": 1.7, "rounds": 0});
        let plan = Plan::repair(&value, TaskCategory::VerbalReasoning, Mode::Deep);
        assert_eq!(plan.confidence_target, 1.0);
        assert_eq!(plan.rounds, 1);
    }

    #[test]
    fn test_from_planner_text_without_json() {
        let plan = Plan::from_planner_text("I think we should...", TaskCategory::Mixed, Mode::Deep);
        assert_eq!(plan, Plan::fallback(TaskCategory::Mixed, Mode::Deep));
    }

    #[test]
    fn test_clarification_render() {
        let question = ClarificationQuestion {
            question: "Which deployment target?".to_string(),
            options: vec!["Kubernetes".into(), "Bare metal".into(), "Serverless".into()],
        };
        assert_eq!(
            question.render(),
            "Which deployment target? (choose A/B/C):\nA) Kubernetes\nB) Bare metal\nC) Serverless"
        );
    }

    #[test]
    fn test_valid_clarification_kept() {
        let value = json!({
            "clarificationQuestion": {"question": "Scope?", "options": ["Small", "Medium", "Large"]}
        });
        let plan = Plan::repair(&value, TaskCategory::VerbalReasoning, Mode::Audit);
        assert_eq!(plan.clarification_question.unwrap().options.len(), 3);
    }
}
