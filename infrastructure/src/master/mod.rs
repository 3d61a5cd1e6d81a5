//! Planner and synthesizer backed by the master model.
//!
//! Both send one JSON-mode request through the shared [`GenerativeClient`]
//! and repair what comes back. Only a synthesis without a usable reply is an
//! error; a malformed plan is repaired into the fallback plan.

use async_trait::async_trait;
use roundtable_application::{
    ConfigSource, GatewayError, GenerationRequest, GenerativeClient, PlanInput, Planner, Purpose,
    SynthesisInput, Synthesizer, generate_with_timeout,
};
use roundtable_domain::{Message, Plan, PromptContext, PromptTemplate, Synthesis};
use std::sync::Arc;
use tracing::debug;

pub struct ModelPlanner {
    client: Arc<dyn GenerativeClient>,
    config: Arc<dyn ConfigSource>,
}

impl ModelPlanner {
    pub fn new(client: Arc<dyn GenerativeClient>, config: Arc<dyn ConfigSource>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Planner for ModelPlanner {
    async fn plan(&self, input: PlanInput<'_>) -> Result<Plan, GatewayError> {
        let config = self.config.snapshot();
        let ctx = PromptContext {
            category: input.hint,
            request: input.request,
        };
        let request = GenerationRequest::new(
            Purpose::Planner,
            config.models().master.clone(),
            PromptTemplate::planner_messages(&ctx),
        )
        .with_json_mode();

        let generation = generate_with_timeout(
            self.client.as_ref(),
            request,
            config.execution().request_timeout,
        )
        .await?;
        debug!(provider = %generation.provider, "Planner replied");

        Ok(Plan::from_planner_text(
            &generation.text,
            input.hint,
            input.request.mode,
        ))
    }
}

pub struct ModelSynthesizer {
    client: Arc<dyn GenerativeClient>,
    config: Arc<dyn ConfigSource>,
}

impl ModelSynthesizer {
    pub fn new(client: Arc<dyn GenerativeClient>, config: Arc<dyn ConfigSource>) -> Self {
        Self { client, config }
    }

    fn messages(input: &SynthesisInput<'_>) -> Vec<Message> {
        let mut messages = PromptTemplate::synthesis_messages(
            input.request,
            input.plan,
            input.scored,
            input.merge,
            input.ask_threshold,
        );
        if input.require_time_estimate {
            messages.push(Message::user(PromptTemplate::time_estimate_requirement()));
        }
        messages
    }
}

#[async_trait]
impl Synthesizer for ModelSynthesizer {
    async fn synthesize(&self, input: SynthesisInput<'_>) -> Result<Synthesis, GatewayError> {
        let config = self.config.snapshot();
        let request = GenerationRequest::new(
            Purpose::Synthesizer,
            config.models().master.clone(),
            Self::messages(&input),
        )
        .with_json_mode();

        let generation = generate_with_timeout(
            self.client.as_ref(),
            request,
            config.execution().request_timeout,
        )
        .await?;

        Synthesis::from_synthesizer_text(&generation.text, input.category).ok_or_else(|| {
            GatewayError::InvalidResponse(format!(
                "synthesis from {} has no replyMarkdown",
                generation.provider
            ))
        })
    }
}
