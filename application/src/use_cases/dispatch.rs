//! Concurrent responder dispatch
//!
//! Runs one generative call per role with at most `concurrency` in flight.
//! Each call is raced against its own timer; a timeout, provider error or
//! panicked task turns into the fixed placeholder output for that role.
//! The batch never fails and returns only after every call has settled.

use crate::ports::generative_client::{GatewayError, GenerationRequest, GenerativeClient, Purpose};
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::shared::generate_with_timeout;
use roundtable_domain::{AgentOutput, Message, ModelSpec, ResponderOutput, Role};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// One responder call
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub role: Role,
    pub model: ModelSpec,
    pub messages: Vec<Message>,
}

impl AgentRequest {
    fn into_generation(self) -> GenerationRequest {
        GenerationRequest::new(Purpose::Responder(self.role), self.model, self.messages)
            .with_json_mode()
    }
}

/// Bounded fan-out over a [`GenerativeClient`].
pub struct Dispatcher {
    client: Arc<dyn GenerativeClient>,
    concurrency: usize,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn GenerativeClient>, concurrency: usize, timeout: Duration) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Run every request; the result holds exactly one output per role.
    pub async fn run(
        &self,
        requests: Vec<AgentRequest>,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AgentOutput> {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut pending: BTreeSet<Role> = requests.iter().map(|r| r.role).collect();
        let mut join_set = JoinSet::new();

        for request in requests {
            let client = Arc::clone(&self.client);
            let permits = Arc::clone(&permits);
            let timeout = self.timeout;

            join_set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails on shutdown
                let _permit = permits.acquire_owned().await.ok();
                run_single(client.as_ref(), request, timeout).await
            });
        }

        let mut outputs = Vec::with_capacity(pending.len());

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(output) => {
                    info!(
                        role = %output.role,
                        duration_ms = output.duration_ms,
                        degraded = output.output.is_degraded(),
                        "Responder settled"
                    );
                    progress.on_role_complete(
                        output.role,
                        output.duration_ms,
                        output.output.is_degraded(),
                    );
                    pending.remove(&output.role);
                    outputs.push(output);
                }
                Err(e) => {
                    warn!("Responder task join error: {}", e);
                }
            }
        }

        for role in pending {
            warn!(role = %role, "Responder task lost; substituting placeholder");
            progress.on_role_complete(role, 0, true);
            outputs.push(AgentOutput::new(
                role,
                ResponderOutput::placeholder(role, "responder task failed"),
                0,
            ));
        }

        outputs
    }
}

/// One time-boxed call.
async fn run_single(
    client: &dyn GenerativeClient,
    request: AgentRequest,
    timeout: Duration,
) -> AgentOutput {
    let role = request.role;
    let started = Instant::now();

    let output = match generate_with_timeout(client, request.into_generation(), timeout).await {
        Ok(generation) => {
            debug!(role = %role, provider = %generation.provider, "Responder answered");
            ResponderOutput::from_text(role, &generation.text)
        }
        Err(GatewayError::Timeout) => {
            warn!(role = %role, timeout_ms = timeout.as_millis() as u64, "Responder timed out");
            ResponderOutput::placeholder(role, GatewayError::Timeout.to_string())
        }
        Err(e) => {
            warn!(role = %role, "Responder failed: {}", e);
            ResponderOutput::placeholder(role, e.to_string())
        }
    };

    AgentOutput::new(role, output, started.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generative_client::Generation;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use roundtable_domain::ProviderKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    // ==================== Test Mocks ====================

    /// Answers per role: a delay, then text or an error.
    struct ScriptedClient {
        delays: Vec<(Role, Duration)>,
        failing: Vec<Role>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                delays: Vec::new(),
                failing: Vec::new(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, role: Role, delay: Duration) -> Self {
            self.delays.push((role, delay));
            self
        }

        fn failing(mut self, role: Role) -> Self {
            self.failing.push(role);
            self
        }
    }

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn generate(
            &self,
            request: GenerationRequest,
            cancel: CancellationToken,
        ) -> Result<Generation, GatewayError> {
            let Purpose::Responder(role) = request.purpose else {
                return Err(GatewayError::Other("unexpected purpose".into()));
            };
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self
                .delays
                .iter()
                .find(|(r, _)| *r == role)
                .map(|(_, d)| *d)
                .unwrap_or(Duration::from_millis(10));

            let result = tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if self.failing.contains(&role) {
                        Err(GatewayError::ConnectionError("refused".into()))
                    } else {
                        Ok(Generation::new(
                            format!("- {role} answer\nConfidence score: 0.9\nRisk score: 0.1"),
                            ProviderKind::Dummy,
                        ))
                    }
                }
                _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn requests(roles: &[Role]) -> Vec<AgentRequest> {
        roles
            .iter()
            .map(|&role| AgentRequest {
                role,
                model: ModelSpec::dummy(),
                messages: vec![Message::user("hi")],
            })
            .collect()
    }

    fn output_for(outputs: &[AgentOutput], role: Role) -> &AgentOutput {
        outputs.iter().find(|o| o.role == role).unwrap()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_one_output_per_role() {
        let client = Arc::new(ScriptedClient::new());
        let dispatcher = Dispatcher::new(client, 2, Duration::from_secs(5));

        let outputs = dispatcher
            .run(requests(&Role::TRIAD), &NoProgress)
            .await;

        assert_eq!(outputs.len(), 3);
        for role in Role::TRIAD {
            assert!(!output_for(&outputs, role).output.is_placeholder());
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let client = Arc::new(ScriptedClient::new());
        let dispatcher = Dispatcher::new(client.clone(), 2, Duration::from_secs(5));

        let outputs = dispatcher.run(requests(&Role::ALL), &NoProgress).await;

        assert_eq!(outputs.len(), 7);
        assert!(client.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_placeholder() {
        let client = Arc::new(
            ScriptedClient::new().with_delay(Role::Critic, Duration::from_secs(3600)),
        );
        let dispatcher = Dispatcher::new(client, 3, Duration::from_millis(200));

        let outputs = dispatcher
            .run(requests(&Role::TRIAD), &NoProgress)
            .await;

        let critic = output_for(&outputs, Role::Critic);
        assert!(critic.output.is_placeholder());
        assert!(!output_for(&outputs, Role::Solver).output.is_placeholder());
        assert!(critic.duration_ms >= 200);
    }

    #[tokio::test]
    async fn test_provider_error_is_isolated() {
        let client = Arc::new(ScriptedClient::new().failing(Role::Verifier));
        let dispatcher = Dispatcher::new(client, 2, Duration::from_secs(5));

        let outputs = dispatcher
            .run(requests(&Role::TRIAD), &NoProgress)
            .await;

        assert_eq!(outputs.len(), 3);
        assert!(output_for(&outputs, Role::Verifier).output.is_placeholder());
        assert!(!output_for(&outputs, Role::Solver).output.is_placeholder());
    }
}
