//! Prompt templates for every model call in the pipeline

use super::message::Message;
use crate::core::request::ChatRequest;
use crate::merge::assembler::MergeResult;
use crate::merge::unit::MergeUnit;
use crate::orchestration::category::TaskCategory;
use crate::orchestration::role::Role;
use crate::scoring::scorer::ScoredOutput;
use crate::synthesis::plan::Plan;
use crate::synthesis::guardrails::TIME_ESTIMATE_MARKER;

/// Context shared by all responder prompts of one request
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub category: TaskCategory,
    pub request: &'a ChatRequest,
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// One-line brief for each role
    pub fn role_instruction(role: Role) -> &'static str {
        match role {
            Role::Solver => "Provide the primary answer. Be complete and structured.",
            Role::Critic => {
                "Identify gaps, contradictions, and high-risk assumptions. Provide fixes."
            }
            Role::Verifier => "Check correctness and compliance; flag unsupported claims.",
            Role::Impl => "Focus on implementation details, tests, and acceptance criteria.",
            Role::Visual => "Focus on any visual attachments; cite evidence from images.",
            Role::Promptsmith => "Optimize prompts, rubrics, and system instructions.",
            Role::Grok => "Summarize constraints, unknowns, and alternatives succinctly.",
        }
    }

    /// Output contract every responder is given
    pub fn output_schema() -> &'static str {
        r#"Respond with a single JSON object:
{
  "agent": "<your role>",
  "answerSummary": ["3-7 bullets"],
  "assumptions": ["decision-relevant assumptions"],
  "reasoning": "short reasoning",
  "stepsOrDeliverables": ["concrete steps or deliverables"],
  "failureModes": ["failure modes and caveats"],
  "units": [{"id": "u1", "topic": "...", "text": "one atomic claim", "tags": []}],
  "selfConfidence": 0.0
}

If you cannot produce JSON, use these sections instead:
1) Answer Summary (3-7 bullets)
2) Assumptions (decision-relevant)
3) Reasoning (short)
4) Steps/Deliverable
5) Failure Modes/Caveats
6) Confidence score: <0-1>
7) Risk score: <0-1>"#
    }

    pub fn responder_system(role: Role) -> String {
        format!(
            "You are a specialist agent ({}). Follow instructions exactly.\n{}\n\n{}",
            role,
            Self::role_instruction(role),
            Self::output_schema()
        )
    }

    pub fn responder_user(ctx: &PromptContext<'_>) -> String {
        let request = ctx.request;
        let mut blocks = vec![
            format!("Task type: {}", ctx.category),
            format!("Mode: {}", request.mode),
        ];
        if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
            blocks.push(format!("Context: {context}"));
        }
        if request.has_attachments() {
            let listing: Vec<String> = request
                .attachments
                .iter()
                .map(|a| {
                    format!(
                        "- {} ({})",
                        a.name.as_deref().unwrap_or("attachment"),
                        a.content_type.as_deref().unwrap_or("unknown")
                    )
                })
                .collect();
            blocks.push(format!("Attachments:\n{}", listing.join("\n")));
        }
        blocks.push(format!("Message: {}", request.message));
        blocks.join("\n\n")
    }

    /// System + user messages for one responder
    pub fn responder_messages(role: Role, ctx: &PromptContext<'_>) -> Vec<Message> {
        vec![
            Message::system(Self::responder_system(role)),
            Message::user(Self::responder_user(ctx)),
        ]
    }

    pub fn planner_system() -> &'static str {
        r#"You are the orchestrator of a panel of specialist agents (solver, critic, verifier, impl, visual, promptsmith, grok).
Decide how the request should be handled and reply with one JSON object:
{
  "taskType": "PROMPT_ENGINEERING | VERBAL_REASONING | TECHNICAL_EXECUTION | VISUAL_ANALYSIS | MIXED",
  "needsClarification": false,
  "clarificationQuestion": {"question": "...", "options": ["...", "...", "..."]},
  "agentsToRun": ["solver", "critic", "verifier"],
  "rounds": 1,
  "focus": ["..."],
  "expectedOutputShape": "ask | audit | deep",
  "confidenceTarget": 0.7
}
Omit clarificationQuestion unless the request is genuinely ambiguous."#
    }

    pub fn planner_messages(ctx: &PromptContext<'_>) -> Vec<Message> {
        vec![
            Message::system(Self::planner_system()),
            Message::user(format!(
                "Classifier hint: {}\n\n{}",
                ctx.category,
                Self::responder_user(ctx)
            )),
        ]
    }

    pub fn synthesis_system() -> &'static str {
        r#"You are the moderator. Merge the specialist outputs into one answer.
Use only claims present in the merged units; never invent new facts.
Reply with one JSON object:
{
  "replyMarkdown": "the answer in Markdown",
  "meta": {"taskType": "...", "conflicts": 0, "coverage": 0},
  "audit": {"plan": "...", "decisions": [{"key": "...", "value": "..."}], "disagreements": []}
}
"conflicts" counts unresolved disagreements; "coverage" counts merged units you used."#
    }

    /// User prompt for synthesis from a plan, scored outputs and the merge
    pub fn synthesis_prompt(
        request: &ChatRequest,
        plan: &Plan,
        scored: &[ScoredOutput],
        merge: &MergeResult,
        ask_threshold: f64,
    ) -> String {
        let mut prompt = format!(
            "Original message: {}\n\nPlan: {}\nFocus: {}\nAsk-user threshold: {:.2}\n\nScores:\n",
            request.message,
            plan.describe(),
            if plan.focus.is_empty() {
                "-".to_string()
            } else {
                plan.focus.join(", ")
            },
            ask_threshold
        );

        for item in scored {
            prompt.push_str(&format!(
                "- {}: credibility={:.2} status={} weighted={:.3}\n",
                item.role, item.credibility, item.status, item.weighted_score
            ));
        }

        prompt.push_str("\nMerged units:\n");
        prompt.push_str(&Self::unit_listing(&merge.merged));

        if !merge.disagreements.is_empty() {
            prompt.push_str("\n\nDisagreements:\n");
            prompt.push_str(&Self::unit_listing(&merge.disagreements));
        }

        prompt
    }

    pub fn synthesis_messages(
        request: &ChatRequest,
        plan: &Plan,
        scored: &[ScoredOutput],
        merge: &MergeResult,
        ask_threshold: f64,
    ) -> Vec<Message> {
        vec![
            Message::system(Self::synthesis_system()),
            Message::user(Self::synthesis_prompt(
                request,
                plan,
                scored,
                merge,
                ask_threshold,
            )),
        ]
    }

    /// Extra instruction appended when a synthesis omitted its time estimate
    pub fn time_estimate_requirement() -> String {
        format!(
            "The reply MUST include a section titled \"### {TIME_ESTIMATE_MARKER}\" with a realistic estimate for the steps and deliverables."
        )
    }

    pub fn polish_messages(units: &[MergeUnit]) -> Vec<Message> {
        vec![
            Message::system(
                "You are an editor. Rewrite the answer using only the provided units; do not add claims. Output plain Markdown without new facts.",
            ),
            Message::user(format!("Units:\n{}", Self::unit_listing(units))),
        ]
    }

    fn unit_listing(units: &[MergeUnit]) -> String {
        if units.is_empty() {
            return "- None".to_string();
        }
        units
            .iter()
            .map(|u| format!("- {}: {}", u.id, u.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
