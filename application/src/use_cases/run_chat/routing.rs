//! Routing phase: classify, weight, select roles, fit them to the budget.

use super::RunChatUseCase;
use super::types::RunChatError;
use crate::config::OrchestrationConfig;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::dispatch::AgentRequest;
use futures::future::join_all;
use roundtable_domain::{
    BudgetDecision, ChatRequest, Classification, PromptContext, PromptTemplate, Role, RoleTable,
    SelectionContext, TaskCategory, apply_budget, select_roles, weights_for,
};
use tracing::{debug, info};

/// Everything routing decided for one request
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub classification: Classification,
    pub category: TaskCategory,
    pub weights: RoleTable<f64>,
    pub budget: BudgetDecision,
    /// One request per role that survived the budget, in selection order
    pub requests: Vec<AgentRequest>,
}

impl RoutePlan {
    pub fn roles(&self) -> &[Role] {
        &self.budget.selected_roles
    }
}

impl RunChatUseCase {
    pub(super) async fn route(
        &self,
        request: &ChatRequest,
        config: &OrchestrationConfig,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoutePlan, RunChatError> {
        let classification = self
            .classifier
            .classify(&request.message, &request.attachments);
        let category = classification.category();
        let weights = weights_for(&classification);

        let candidates = select_roles(
            SelectionContext {
                mode: request.mode,
                classification: &classification,
                has_attachments: request.has_attachments(),
            },
            &config.policy().overrides,
        );
        if candidates.is_empty() {
            return Err(RunChatError::NoRolesEnabled {
                category,
                mode: request.mode,
            });
        }

        let ctx = PromptContext { category, request };
        let mut requests: Vec<AgentRequest> = candidates
            .iter()
            .map(|&role| AgentRequest {
                role,
                model: config.models().for_role(role).clone(),
                messages: PromptTemplate::responder_messages(role, &ctx),
            })
            .collect();

        let estimates = self.estimate_tokens(&requests).await;
        let budget = apply_budget(
            &candidates,
            &estimates,
            request.mode,
            config.policy().caps,
        );
        requests.retain(|r| budget.selected_roles.contains(&r.role));

        info!(
            category = %category,
            mode = %request.mode,
            roles = ?budget.selected_roles,
            estimated_usd = budget.estimated_cost_usd,
            cap_usd = budget.cap_usd,
            mode_cap_exceeded = budget.mode_cap_exceeded(),
            "Routing plan"
        );
        progress.on_routed(category, request.mode, &budget.selected_roles);

        Ok(RoutePlan {
            classification,
            category,
            weights,
            budget,
            requests,
        })
    }

    /// Token estimate per role; a failed estimate counts as the role's `max_tokens`.
    async fn estimate_tokens(&self, requests: &[AgentRequest]) -> RoleTable<u32> {
        let results = join_all(
            requests
                .iter()
                .map(|r| self.estimator.estimate(&r.model, &r.messages)),
        )
        .await;

        let mut estimates = RoleTable::filled(0u32);
        for (request, result) in requests.iter().zip(results) {
            estimates[request.role] = match result {
                Ok(tokens) => tokens,
                Err(e) => {
                    debug!(role = %request.role, "Token estimate unavailable ({}), using max_tokens", e);
                    request.model.max_tokens
                }
            };
        }
        estimates
    }
}
