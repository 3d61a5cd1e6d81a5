//! Audit/deep retry loop.
//!
//! Each attempt walks `Dispatch → Score → Synthesize → Decide`. Attempts are
//! strictly sequential because the decision reads the previous attempt's
//! scores. The loop stops at the attempt limit, or as soon as no role was
//! invalidated and confidence reached the ask-user threshold.

use super::RunChatUseCase;
use super::routing::RoutePlan;
use crate::config::OrchestrationConfig;
use crate::config::execution_params::MAX_ATTEMPTS;
use crate::ports::master::SynthesisInput;
use crate::ports::progress::ProgressNotifier;
use roundtable_domain::synthesis::confidence::{audit_confidence, base_score};
use roundtable_domain::synthesis::guardrails::{
    has_plan, has_time_estimate, with_default_time_estimate,
};
use roundtable_domain::{
    AgentOutput, ChatRequest, Invalidation, MergeResult, Plan, ScoredOutput, Synthesis, assemble,
    score_outputs,
};
use tracing::{info, warn};

/// Outcome of one completed attempt
#[derive(Debug, Clone)]
pub struct Attempt {
    pub number: u8,
    pub scored: Vec<ScoredOutput>,
    pub merge: MergeResult,
    pub synthesis: Synthesis,
    pub confidence: f64,
    pub invalidation: Invalidation,
}

enum Step {
    Dispatch,
    Score(Vec<AgentOutput>),
    Synthesize {
        scored: Vec<ScoredOutput>,
        merge: MergeResult,
    },
    Decide(Attempt),
}

/// Whether another attempt should run after `attempt`.
pub fn should_retry(
    attempt: u8,
    max_attempts: u8,
    invalidation: &Invalidation,
    confidence: f64,
    ask_threshold: f64,
) -> bool {
    attempt < max_attempts && (invalidation.has_invalid() || confidence < ask_threshold)
}

/// Shared read-only inputs of the loop
pub(super) struct AttemptContext<'a> {
    pub request: &'a ChatRequest,
    pub config: &'a OrchestrationConfig,
    pub route: &'a RoutePlan,
    pub plan: &'a Plan,
}

impl RunChatUseCase {
    pub(super) async fn run_attempts(
        &self,
        ctx: &AttemptContext<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Attempt {
        let policy = ctx.config.policy();
        let max_attempts = ctx.config.execution().max_attempts.clamp(1, MAX_ATTEMPTS);
        let dispatcher = self.dispatcher(ctx.config);

        let mut number: u8 = 1;
        let mut step = Step::Dispatch;

        loop {
            step = match step {
                Step::Dispatch => {
                    progress.on_dispatch_start(number, ctx.route.roles());
                    let outputs = dispatcher.run(ctx.route.requests.clone(), progress).await;
                    Step::Score(outputs)
                }
                Step::Score(outputs) => {
                    let scored = score_outputs(&outputs, &ctx.route.weights, policy.thresholds);
                    let merge = assemble(&scored, self.risk_screen.as_ref());
                    Step::Synthesize { scored, merge }
                }
                Step::Synthesize { scored, merge } => {
                    let synthesis = self.synthesize_guarded(ctx, &scored, &merge, progress).await;
                    let confidence = audit_confidence(
                        base_score(&scored, &ctx.route.weights),
                        synthesis.meta.conflicts,
                        synthesis.meta.coverage,
                    );
                    let invalidation = Invalidation::from_scored(&scored);
                    Step::Decide(Attempt {
                        number,
                        scored,
                        merge,
                        synthesis,
                        confidence,
                        invalidation,
                    })
                }
                Step::Decide(attempt) => {
                    let retry = should_retry(
                        attempt.number,
                        max_attempts,
                        &attempt.invalidation,
                        attempt.confidence,
                        policy.ask_user_threshold,
                    );
                    info!(
                        attempt = attempt.number,
                        confidence = attempt.confidence,
                        discarded = attempt.invalidation.discarded.len(),
                        quarantined = attempt.invalidation.quarantined.len(),
                        retry,
                        "Attempt decided"
                    );
                    progress.on_attempt_complete(attempt.number, attempt.confidence, retry);
                    if !retry {
                        return attempt;
                    }
                    number += 1;
                    Step::Dispatch
                }
            };
        }
    }

    /// Synthesize, enforcing the execution time estimate when responders
    /// produced steps or deliverables.
    ///
    /// A missing estimate triggers one regeneration with the requirement
    /// stated; if it is still missing the default estimate is appended.
    async fn synthesize_guarded(
        &self,
        ctx: &AttemptContext<'_>,
        scored: &[ScoredOutput],
        merge: &MergeResult,
        progress: &dyn ProgressNotifier,
    ) -> Synthesis {
        let mut input = SynthesisInput {
            request: ctx.request,
            plan: ctx.plan,
            category: ctx.route.category,
            scored,
            merge,
            ask_threshold: ctx.config.policy().ask_user_threshold,
            require_time_estimate: false,
        };

        let synthesis = self.synthesize_once(input, progress).await;
        if !has_plan(scored) || has_time_estimate(&synthesis.reply_markdown) {
            return synthesis;
        }

        info!("Synthesis lacks a time estimate; regenerating");
        input.require_time_estimate = true;
        let mut synthesis = self.synthesize_once(input, progress).await;
        if !has_time_estimate(&synthesis.reply_markdown) {
            synthesis.reply_markdown = with_default_time_estimate(&synthesis.reply_markdown);
        }
        synthesis
    }

    async fn synthesize_once(
        &self,
        input: SynthesisInput<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Synthesis {
        progress.on_master_call("synthesis");
        match self.synthesizer.synthesize(input).await {
            Ok(synthesis) => synthesis,
            Err(e) => {
                warn!("Synthesis failed, using merge fallback: {}", e);
                Synthesis::fallback(input.merge, input.category)
            }
        }
    }
}
