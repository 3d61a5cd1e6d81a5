//! Console output formatter for chat outcomes

use crate::server::dto::ChatResponseBody;
use colored::Colorize;
use roundtable_application::{ChatOutcome, ResponseMeta};
use roundtable_domain::{Role, Status};

/// Formats chat outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Reply text only
    pub fn format_reply(outcome: &ChatOutcome) -> String {
        outcome.reply.clone()
    }

    /// Reply followed by a metadata summary
    pub fn format(outcome: &ChatOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Roundtable"));
        output.push_str("\n\n");
        output.push_str(&outcome.reply);
        output.push('\n');

        output.push_str(&Self::section_header("Run"));
        output.push_str(&Self::meta_lines(&outcome.meta));
        if let Some(run_id) = &outcome.run_id {
            output.push_str(&format!("{} {}\n", "Run id:".cyan().bold(), run_id));
        }

        if let Some(audit) = &outcome.audit {
            output.push_str(&Self::section_header("Scores"));
            for score in &audit.scores {
                let line = format!(
                    "  {:<12} credibility={:.2} weighted={:.3} {}ms",
                    score.role.as_str(),
                    score.credibility,
                    score.weighted_score,
                    score.duration_ms
                );
                output.push_str(&format!("{} {}\n", line, Self::status_tag(score.status)));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// The HTTP response body as pretty JSON
    pub fn format_json(outcome: &ChatOutcome) -> String {
        serde_json::to_string_pretty(&ChatResponseBody::from(outcome.clone()))
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn meta_lines(meta: &ResponseMeta) -> String {
        let mut lines = vec![
            format!("{} {}", "Task type:".cyan().bold(), meta.task_type),
            format!("{} {:.3}", "Confidence:".cyan().bold(), meta.c_final),
            format!(
                "{} ${:.4} of ${:.4}{}",
                "Budget:".cyan().bold(),
                meta.budget.estimated_usd,
                meta.budget.cap_usd,
                if meta.budget.mode_cap_exceeded {
                    format!(" {}", "(roles trimmed)".yellow())
                } else {
                    String::new()
                }
            ),
            format!("{} {}", "Agents:".cyan().bold(), Self::roles(&meta.used_agents)),
            format!("{} {}", "Attempts:".cyan().bold(), meta.attempts),
        ];
        if !meta.invalidation.discarded.is_empty() {
            lines.push(format!(
                "{} {}",
                "Discarded:".red().bold(),
                Self::roles(&meta.invalidation.discarded)
            ));
        }
        if !meta.invalidation.quarantined.is_empty() {
            lines.push(format!(
                "{} {}",
                "Quarantined:".yellow().bold(),
                Self::roles(&meta.invalidation.quarantined)
            ));
        }
        lines.join("\n") + "\n"
    }

    fn roles(roles: &[Role]) -> String {
        if roles.is_empty() {
            return "-".to_string();
        }
        roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
    }

    fn status_tag(status: Status) -> String {
        let text = status.as_str();
        match status {
            Status::Valid => text.green().to_string(),
            Status::Quarantine => text.yellow().to_string(),
            Status::Discard => text.red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::BudgetMeta;
    use roundtable_domain::{Invalidation, TaskCategory};

    fn outcome() -> ChatOutcome {
        ChatOutcome {
            reply: "TL;DR\n- Use an index\n\nConfidence score: 0.81".to_string(),
            meta: ResponseMeta {
                task_type: TaskCategory::TechnicalExecution,
                c_final: 0.81,
                budget: BudgetMeta {
                    cap_usd: 0.05,
                    estimated_usd: 0.012,
                    mode_cap_exceeded: true,
                },
                used_agents: vec![Role::Solver, Role::Impl],
                invalidation: Invalidation {
                    discarded: vec![Role::Critic],
                    quarantined: vec![],
                    valid: vec![Role::Solver, Role::Impl],
                },
                attempts: 1,
                clarification: false,
            },
            audit: None,
            run_id: Some("run-1".to_string()),
        }
    }

    #[test]
    fn test_format_includes_reply_and_meta() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&outcome());
        assert!(text.contains("- Use an index"));
        assert!(text.contains("Confidence: 0.810"));
        assert!(text.contains("Agents: solver, impl"));
        assert!(text.contains("Discarded: critic"));
        assert!(text.contains("(roles trimmed)"));
        assert!(text.contains("Run id: run-1"));
        assert!(!text.contains("Quarantined:"));
    }

    #[test]
    fn test_format_json_matches_api_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&outcome())).unwrap();
        assert_eq!(value["runId"], "run-1");
        assert_eq!(value["meta"]["usedAgents"][1], "impl");
        assert_eq!(value["meta"]["budget"]["modeCapExceeded"], true);
    }
}
