//! Run Chat use case
//!
//! Orchestrates one chat request end to end:
//!
//! 1. **Route**: classify, weight, select roles, fit them to the cost cap
//! 2. **Ask mode**: one dispatch, score, merge; answer or ask back
//! 3. **Audit/deep mode**: plan, then the bounded retry loop in [`attempts`]
//!    (dispatch, score, synthesize, decide), optional polish, audit appendix
//! 4. **Record**: hand the run to the recorder; failures only warn
//!
//! Provider, planner and synthesizer failures never fail the request. They
//! degrade into placeholders and fallbacks that show up in confidence and
//! invalidation lists instead.

mod attempts;
mod routing;
mod types;

pub use attempts::{Attempt, should_retry};
pub use routing::RoutePlan;
pub use types::{AuditTrail, BudgetMeta, ChatOutcome, ResponseMeta, RoleScore, RunChatError};

use crate::config::OrchestrationConfig;
use crate::ports::config_source::ConfigSource;
use crate::ports::generative_client::{GenerationRequest, GenerativeClient, Purpose};
use crate::ports::master::{PlanInput, Planner, Synthesizer};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_recorder::{NoRunRecorder, RunRecord, RunRecorder};
use crate::ports::token_estimator::TokenEstimator;
use crate::use_cases::dispatch::Dispatcher;
use crate::use_cases::shared::generate_with_timeout;
use attempts::AttemptContext;
use roundtable_domain::merge::assembler::ranked_valid;
use roundtable_domain::render::audit::post_discard_weights;
use roundtable_domain::synthesis::confidence::ask_confidence;
use roundtable_domain::synthesis::guardrails::{
    has_plan, has_time_estimate, with_default_time_estimate,
};
use roundtable_domain::{
    AuditInput, ChatRequest, Invalidation, KeywordClassifier, MergeResult, Mode,
    PatternRiskScreen, Plan, PromptTemplate, ReplyInput, RiskScreen, ScoredOutput,
    TaskClassifier, assemble, clarification_text, render_audit_appendix, render_reply,
    score_outputs,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A finished pipeline run before recording
struct Finished {
    reply: String,
    meta: ResponseMeta,
    audit: Option<AuditTrail>,
    plan: Option<Plan>,
    scored: Vec<ScoredOutput>,
}

/// Use case for answering one chat request
pub struct RunChatUseCase {
    client: Arc<dyn GenerativeClient>,
    estimator: Arc<dyn TokenEstimator>,
    planner: Arc<dyn Planner>,
    synthesizer: Arc<dyn Synthesizer>,
    config: Arc<dyn ConfigSource>,
    recorder: Arc<dyn RunRecorder>,
    classifier: Arc<dyn TaskClassifier>,
    risk_screen: Arc<dyn RiskScreen>,
}

impl RunChatUseCase {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        estimator: Arc<dyn TokenEstimator>,
        planner: Arc<dyn Planner>,
        synthesizer: Arc<dyn Synthesizer>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            client,
            estimator,
            planner,
            synthesizer,
            config,
            recorder: Arc::new(NoRunRecorder),
            classifier: Arc::new(KeywordClassifier),
            risk_screen: Arc::new(PatternRiskScreen),
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn RunRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TaskClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_risk_screen(mut self, risk_screen: Arc<dyn RiskScreen>) -> Self {
        self.risk_screen = risk_screen;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: ChatRequest) -> Result<ChatOutcome, RunChatError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: ChatRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<ChatOutcome, RunChatError> {
        request.validate()?;
        let config = self.config.snapshot();

        let route = self.route(&request, &config, progress).await?;

        let finished = if request.mode.is_thorough() {
            self.run_thorough(&request, &config, &route, progress).await
        } else {
            self.run_ask(&request, &config, &route, progress).await
        };

        let run_id = self.record(&request, &finished);

        Ok(ChatOutcome {
            reply: finished.reply,
            meta: finished.meta,
            audit: finished.audit,
            run_id,
        })
    }

    fn dispatcher(&self, config: &OrchestrationConfig) -> Dispatcher {
        let execution = config.execution();
        Dispatcher::new(
            Arc::clone(&self.client),
            execution.concurrency,
            execution.request_timeout,
        )
    }

    /// Single attempt; confidence is the sum of weighted scores.
    async fn run_ask(
        &self,
        request: &ChatRequest,
        config: &OrchestrationConfig,
        route: &RoutePlan,
        progress: &dyn ProgressNotifier,
    ) -> Finished {
        let policy = config.policy();

        progress.on_dispatch_start(1, route.roles());
        let outputs = self
            .dispatcher(config)
            .run(route.requests.clone(), progress)
            .await;
        let scored = score_outputs(&outputs, &route.weights, policy.thresholds);
        let merge = assemble(&scored, self.risk_screen.as_ref());
        let confidence = ask_confidence(&scored);
        let clarification = confidence < policy.ask_user_threshold;

        info!(
            mode = %request.mode,
            confidence,
            clarification,
            merged = merge.merged.len(),
            "Ask decided"
        );
        progress.on_attempt_complete(1, confidence, false);

        let reply = if clarification {
            clarification_text(None)
        } else {
            let assumptions = lead_assumptions(&scored);
            render_reply(&ReplyInput {
                disagreements: &merge.disagreements,
                ..ReplyInput::new(&merge.merged, &assumptions, confidence)
            })
        };

        Finished {
            reply,
            meta: meta(route, confidence, Invalidation::from_scored(&scored), 1, clarification),
            audit: None,
            plan: None,
            scored,
        }
    }

    /// Plan, retry loop, optional polish, audit appendix.
    async fn run_thorough(
        &self,
        request: &ChatRequest,
        config: &OrchestrationConfig,
        route: &RoutePlan,
        progress: &dyn ProgressNotifier,
    ) -> Finished {
        let plan = self.plan(request, route, progress).await;
        let ctx = AttemptContext {
            request,
            config,
            route,
            plan: &plan,
        };
        let attempt = self.run_attempts(&ctx, progress).await;

        let clarification = attempt.confidence < config.policy().ask_user_threshold;
        let units_used = attempt.merge.unit_ids();
        let shown_units = (request.mode == Mode::Deep).then_some(units_used.as_slice());

        let reply = if clarification {
            clarification_text(Some(&plan))
        } else {
            let polished = if request.mode == Mode::Deep && config.features().polish {
                self.polish(config, &attempt.merge).await
            } else {
                None
            };
            let body = match polished {
                Some(text) if has_plan(&attempt.scored) && !has_time_estimate(&text) => {
                    with_default_time_estimate(&text)
                }
                Some(text) => text,
                None => attempt.synthesis.reply_markdown.clone(),
            };
            let appendix = render_audit_appendix(&AuditInput {
                task_type: route.category,
                weights: &route.weights,
                scored: &attempt.scored,
                merge: &attempt.merge,
                budget_usd: route.budget.estimated_cost_usd,
                units_used: shown_units,
            });
            let assumptions = lead_assumptions(&attempt.scored);
            render_reply(&ReplyInput {
                merged_units: &attempt.merge.merged,
                assumptions: &assumptions,
                confidence: attempt.confidence,
                disagreements: &attempt.merge.disagreements,
                units_used: shown_units,
                polished: Some(&body),
                audit_appendix: Some(&appendix),
            })
        };

        let audit = AuditTrail {
            plan: plan.clone(),
            weights: post_discard_weights(&attempt.scored, &route.weights)
                .into_iter()
                .collect(),
            scores: attempt.scored.iter().map(RoleScore::from).collect(),
            units_used,
            quarantined: attempt.merge.quarantined.clone(),
            disagreements: attempt.merge.disagreements.clone(),
            synthesis: attempt.synthesis.audit.clone(),
        };

        Finished {
            reply,
            meta: meta(
                route,
                attempt.confidence,
                attempt.invalidation,
                attempt.number,
                clarification,
            ),
            audit: Some(audit),
            plan: Some(plan),
            scored: attempt.scored,
        }
    }

    async fn plan(
        &self,
        request: &ChatRequest,
        route: &RoutePlan,
        progress: &dyn ProgressNotifier,
    ) -> Plan {
        progress.on_master_call("plan");
        let input = PlanInput {
            request,
            hint: route.category,
        };
        match self.planner.plan(input).await {
            Ok(plan) => {
                debug!(plan = %plan.describe(), "Plan ready");
                plan
            }
            Err(e) => {
                warn!("Planner failed, using fallback plan: {}", e);
                Plan::fallback(route.category, request.mode)
            }
        }
    }

    /// Editor rewrite of the merged units. `None` keeps the synthesis text.
    async fn polish(&self, config: &OrchestrationConfig, merge: &MergeResult) -> Option<String> {
        if merge.merged.is_empty() {
            return None;
        }
        let request = GenerationRequest::new(
            Purpose::Polish,
            config.models().polish().clone(),
            PromptTemplate::polish_messages(&merge.merged),
        );
        match generate_with_timeout(
            self.client.as_ref(),
            request,
            config.execution().request_timeout,
        )
        .await
        {
            Ok(generation) => Some(generation.text.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Polish failed, keeping synthesis: {}", e);
                None
            }
        }
    }

    fn record(&self, request: &ChatRequest, finished: &Finished) -> Option<String> {
        let record = RunRecord {
            request,
            plan: finished.plan.as_ref(),
            scored: &finished.scored,
            reply: &finished.reply,
            meta: &finished.meta,
        };
        match self.recorder.record(&record) {
            Ok(run_id) if !run_id.is_empty() => Some(run_id),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to record run: {}", e);
                None
            }
        }
    }
}

/// Assumptions of the top VALID output, if any.
fn lead_assumptions(scored: &[ScoredOutput]) -> Vec<String> {
    ranked_valid(scored)
        .first()
        .map(|s| s.output.assumptions())
        .unwrap_or_default()
}

fn meta(
    route: &RoutePlan,
    c_final: f64,
    invalidation: Invalidation,
    attempts: u8,
    clarification: bool,
) -> ResponseMeta {
    ResponseMeta {
        task_type: route.category,
        c_final,
        budget: BudgetMeta::from(&route.budget),
        used_agents: route.roles().to_vec(),
        invalidation,
        attempts,
        clarification,
    }
}
