//! Domain layer for roundtable
//!
//! This crate contains the orchestration logic of the answer pipeline. It
//! performs no I/O: every function here is a deterministic transformation
//! that the application layer drives.
//!
//! # Pipeline
//!
//! 1. **Routing**: classify the request, derive role weights, select roles,
//!    fit the role set to the cost cap
//! 2. **Responder outputs**: parse model text into a structured report, or
//!    an explicit degraded variant
//! 3. **Scoring**: axis heuristics, credibility, DISCARD / QUARANTINE / VALID
//! 4. **Merge**: unit-level deduplication with disagreement and quarantine
//! 5. **Synthesis**: plan and synthesis validation, confidence, guardrails
//! 6. **Render**: reply text, audit appendix, clarification question

pub mod agent;
pub mod config;
pub mod core;
pub mod merge;
pub mod orchestration;
pub mod prompt;
pub mod render;
pub mod routing;
pub mod scoring;
pub mod synthesis;

// Re-export commonly used types
pub use agent::{
    output::{AgentOutput, DegradeCause, DegradedReport, ResponderOutput},
    report::{AgentReport, ReportUnit},
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
pub use core::{
    error::DomainError,
    model::{ModelSpec, ProviderKind},
    request::{Attachment, ChatRequest, ChatUser},
};
pub use merge::{
    assembler::{MergeResult, PatternRiskScreen, RiskScreen, assemble},
    unit::MergeUnit,
};
pub use orchestration::{
    category::{Classification, MixedShares, TaskCategory},
    mode::Mode,
    role::Role,
    role_table::RoleTable,
};
pub use prompt::{Message, MessageRole, PromptContext, PromptTemplate};
pub use render::{
    audit::{AuditInput, render_audit_appendix},
    clarification::clarification_text,
    reply::{ReplyInput, render_reply},
};
pub use routing::{
    budget::{BudgetDecision, CostCaps, apply_budget},
    classifier::{KeywordClassifier, TaskClassifier, classify_task},
    selector::{RoleOverrides, SelectionContext, select_roles},
    weights::weights_for,
};
pub use scoring::scorer::{Invalidation, ScoredOutput, Status, Thresholds, score_outputs};
pub use synthesis::{
    draft::{Synthesis, SynthesisAudit, SynthesisMeta},
    plan::{ClarificationQuestion, Plan},
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::output::PLACEHOLDER_TEXT;
    use crate::synthesis::confidence::ask_confidence;

    const SOLVER_TEXT: &str = "Answer Summary\n- Use a read replica for reporting queries\n- Keep writes on the primary\n\nAssumptions\n- Assumption A\n\nReasoning\nReporting load competes with transactional load on the primary.\n\nSteps/Deliverable\n- Provision a replica\n\nFailure Modes/Caveats\n- Replica lag\n\nConfidence score: 0.8\nRisk score: 0.0";

    fn outputs() -> Vec<AgentOutput> {
        vec![
            AgentOutput::new(
                Role::Solver,
                ResponderOutput::from_text(Role::Solver, SOLVER_TEXT),
                120,
            ),
            AgentOutput::new(
                Role::Critic,
                ResponderOutput::from_text(
                    Role::Critic,
                    "- The plan is vague\nConfidence score: 0.4\nRisk score: 0.4",
                ),
                140,
            ),
            AgentOutput::new(
                Role::Verifier,
                ResponderOutput::from_text(
                    Role::Verifier,
                    "- Unverified\nConfidence score: 0.4\nRisk score: 0.5",
                ),
                90,
            ),
        ]
    }

    #[test]
    fn test_golden_scenario() {
        let weights = weights_for(&Classification::single(TaskCategory::VerbalReasoning));
        let scored = score_outputs(&outputs(), &weights, Thresholds::default());

        let by_role = |role: Role| scored.iter().find(|s| s.role == role).unwrap();
        let solver = by_role(Role::Solver);
        assert_eq!(solver.status, Status::Valid);
        assert!((solver.credibility - 0.8).abs() < 1e-9);
        assert!((solver.weighted_score - 0.8).abs() < 1e-9);

        let critic = by_role(Role::Critic);
        assert_eq!(critic.status, Status::Discard);
        assert!((critic.credibility - 0.1).abs() < 1e-9);
        assert_eq!(critic.weighted_score, 0.0);

        let verifier = by_role(Role::Verifier);
        assert_eq!(verifier.status, Status::Discard);
        assert!((verifier.credibility - 0.025).abs() < 1e-9);

        assert_eq!(ask_confidence(&scored), 0.8);

        let merge = assemble(&scored, &PatternRiskScreen);
        assert!(!merge.merged.is_empty());
        assert!(merge.merged.iter().all(|u| u.source_role == Role::Solver));

        let assumptions = vec!["Assumption A".to_string()];
        let reply = render_reply(&ReplyInput::new(&merge.merged, &assumptions, 0.73));
        assert!(reply.contains("Confidence score: 0.73"));
        assert!(reply.contains("- Assumption A"));
        assert!(reply.starts_with("TL;DR"));
    }

    #[test]
    fn test_mixed_classification_shares() {
        let classification =
            classify_task("Write a prompt template that helps debug this API error", &[]);
        let Classification::Mixed { shares } = &classification else {
            panic!("expected MIXED, got {classification:?}");
        };
        assert_eq!(shares.share(TaskCategory::PromptEngineering), 0.5);
        assert_eq!(shares.share(TaskCategory::TechnicalExecution), 0.5);
        assert_eq!(classification.category(), TaskCategory::Mixed);
    }

    #[test]
    fn test_image_attachment_always_visual() {
        let attachments = vec![Attachment::new("screen.png", "image/png")];
        let classification = classify_task("Fix the prompt for this API bug", &attachments);
        assert_eq!(classification.category(), TaskCategory::VisualAnalysis);
    }

    #[test]
    fn test_placeholder_output_is_discarded() {
        let outputs = vec![AgentOutput::new(
            Role::Solver,
            ResponderOutput::placeholder(Role::Solver, "timeout"),
            15_000,
        )];
        let weights = weights_for(&Classification::single(TaskCategory::VerbalReasoning));
        let scored = score_outputs(&outputs, &weights, Thresholds::default());
        assert_eq!(scored[0].status, Status::Discard);
        assert_eq!(scored[0].credibility, 0.0);
        assert!(scored[0].output.raw_text().contains(PLACEHOLDER_TEXT));
    }
}
