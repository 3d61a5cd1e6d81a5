//! Audit appendix for audit/deep replies.

use crate::merge::assembler::MergeResult;
use crate::orchestration::category::TaskCategory;
use crate::orchestration::role::Role;
use crate::orchestration::role_table::RoleTable;
use crate::scoring::scorer::{ScoredOutput, Status, reallocated_weights};

const NONE: &str = "- None";

#[derive(Debug, Clone, Copy)]
pub struct AuditInput<'a> {
    pub task_type: TaskCategory,
    pub weights: &'a RoleTable<f64>,
    pub scored: &'a [ScoredOutput],
    pub merge: &'a MergeResult,
    pub budget_usd: f64,
    pub units_used: Option<&'a [String]>,
}

/// Per-role weights after discarded roles are removed, in scored order.
/// Discarded roles are listed with weight 0.
pub fn post_discard_weights(scored: &[ScoredOutput], weights: &RoleTable<f64>) -> Vec<(Role, f64)> {
    let kept = reallocated_weights(scored, weights);
    scored
        .iter()
        .map(|s| {
            let w = if s.status == Status::Discard {
                0.0
            } else {
                kept.iter()
                    .find(|(r, _)| *r == s.role)
                    .map(|(_, w)| *w)
                    .unwrap_or(0.0)
            };
            (s.role, w)
        })
        .collect()
}

fn section(title: &str, lines: Vec<String>) -> String {
    let body = if lines.is_empty() {
        NONE.to_string()
    } else {
        lines.join("\n")
    };
    format!("{title}\n{body}")
}

pub fn render_audit_appendix(input: &AuditInput<'_>) -> String {
    let weights: Vec<String> = post_discard_weights(input.scored, input.weights)
        .into_iter()
        .map(|(role, w)| format!("- {role}: {w:.3}"))
        .collect();

    let per_agent: Vec<String> = input
        .scored
        .iter()
        .map(|s| {
            let axes: Vec<String> = s
                .axes
                .named()
                .iter()
                .map(|(name, value)| format!("{name}:{value:.1}"))
                .collect();
            format!(
                "- {}: credibility={:.2} status={} weighted={:.3} axes=[{}]",
                s.role,
                s.credibility,
                s.status,
                s.weighted_score,
                axes.join(" ")
            )
        })
        .collect();

    let merge_trace = input
        .merge
        .merged
        .iter()
        .map(|u| format!("- {}: {}", u.id, u.text))
        .collect();
    let quarantine = input
        .merge
        .quarantined
        .iter()
        .map(|u| {
            format!(
                "- {}: {} ({})",
                u.id,
                u.text,
                u.reason.as_deref().unwrap_or("policy")
            )
        })
        .collect();
    let disagreements = input
        .merge
        .disagreements
        .iter()
        .map(|u| format!("- {}: {}", u.id, u.text))
        .collect();

    let mut blocks = vec![
        format!("Audit appendix\nTask type: {}", input.task_type),
        section("Weights (post-discard reallocation)", weights),
        section("Per-agent scores", per_agent),
    ];
    let mut budget = format!("Budget estimate (USD): {:.4}", input.budget_usd);
    if let Some(ids) = input.units_used
        && !ids.is_empty()
    {
        budget.push_str(&format!("\nUnits used: {}", ids.join(", ")));
    }
    blocks.push(budget);
    blocks.push(section("Merge trace", merge_trace));
    blocks.push(section("Quarantine", quarantine));
    blocks.push(section("Disagreements", disagreements));

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::output::ResponderOutput;
    use crate::merge::unit::MergeUnit;
    use crate::scoring::axes::AxisScores;

    fn scored(role: Role, credibility: f64, status: Status, weighted: f64) -> ScoredOutput {
        ScoredOutput {
            role,
            output: ResponderOutput::placeholder(role, "test"),
            duration_ms: 0,
            axes: AxisScores {
                coherence: 12.5,
                ..Default::default()
            },
            credibility,
            status,
            weighted_score: weighted,
        }
    }

    #[test]
    fn test_post_discard_weights() {
        let mut weights = RoleTable::filled(0.0);
        weights[Role::Solver] = 0.33;
        weights[Role::Critic] = 0.2;
        let items = vec![
            scored(Role::Solver, 0.8, Status::Valid, 0.8),
            scored(Role::Critic, 0.1, Status::Discard, 0.0),
        ];
        assert_eq!(
            post_discard_weights(&items, &weights),
            vec![(Role::Solver, 1.0), (Role::Critic, 0.0)]
        );
    }

    #[test]
    fn test_appendix_layout() {
        let mut weights = RoleTable::filled(0.0);
        weights[Role::Solver] = 0.33;
        let items = vec![scored(Role::Solver, 0.8, Status::Valid, 0.8)];
        let merge = MergeResult {
            merged: vec![MergeUnit::new(Role::Solver, 1, "do it")],
            disagreements: vec![],
            quarantined: vec![MergeUnit::new(Role::Grok, 2, "bypass it").with_reason("Matched pattern /\\bbypass\\b/")],
        };
        let ids = vec!["SOLVER-1".to_string()];
        let appendix = render_audit_appendix(&AuditInput {
            task_type: TaskCategory::VerbalReasoning,
            weights: &weights,
            scored: &items,
            merge: &merge,
            budget_usd: 0.01234,
            units_used: Some(&ids),
        });

        let expected = [
            "Audit appendix",
            "Task type: VERBAL_REASONING",
            "",
            "Weights (post-discard reallocation)",
            "- solver: 1.000",
            "",
            "Per-agent scores",
            "- solver: credibility=0.80 status=VALID weighted=0.800 axes=[coherence:12.5 alignment:0.0 verifiability:0.0 signalDensity:0.0 compliance:0.0]",
            "",
            "Budget estimate (USD): 0.0123",
            "Units used: SOLVER-1",
            "",
            "Merge trace",
            "- SOLVER-1: do it [SOLVER]",
            "",
            "Quarantine",
            "- GROK-2: bypass it [GROK] (Matched pattern /\\bbypass\\b/)",
            "",
            "Disagreements",
            "- None",
        ]
        .join("\n");
        assert_eq!(appendix, expected);
    }
}
