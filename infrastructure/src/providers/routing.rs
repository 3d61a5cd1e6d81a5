use super::ProviderAdapter;
use super::anthropic::AnthropicProvider;
use super::dummy::DummyProvider;
use super::openai_compat::OpenAiCompatibleProvider;
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use roundtable_application::{
    GatewayError, Generation, GenerationRequest, GenerativeClient, TokenEstimator,
};
use roundtable_domain::{Message, ModelSpec, ProviderKind};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Routes each call to the adapter named by its model.
///
/// Failed calls are answered by the dummy provider so one broken backend
/// degrades a role instead of failing the request. Cancellation is never
/// rerouted.
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    dummy: Arc<dyn ProviderAdapter>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            providers,
            dummy: Arc::new(DummyProvider),
        }
    }

    /// Gateway with one adapter per enabled provider section.
    pub fn from_config(config: &FileProvidersConfig) -> Self {
        let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
        if config.anthropic.enabled {
            providers.push(Arc::new(AnthropicProvider::new(&config.anthropic)));
        }
        if config.openai.enabled {
            providers.push(Arc::new(OpenAiCompatibleProvider::openai(&config.openai)));
        }
        if config.xai.enabled {
            providers.push(Arc::new(OpenAiCompatibleProvider::xai(&config.xai)));
        }
        debug!(
            providers = ?providers.iter().map(|p| p.kind()).collect::<Vec<_>>(),
            "Provider routing configured"
        );
        Self::new(providers)
    }

    pub fn enabled(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    fn resolve(&self, model: &ModelSpec) -> Result<&dyn ProviderAdapter, GatewayError> {
        if model.provider == ProviderKind::Dummy {
            return Ok(self.dummy.as_ref());
        }
        self.providers
            .iter()
            .find(|p| p.kind() == model.provider)
            .map(|p| p.as_ref())
            .ok_or(GatewayError::ProviderDisabled(model.provider))
    }

    async fn call(&self, request: &GenerationRequest) -> Result<Generation, GatewayError> {
        let adapter = self.resolve(&request.model)?;
        let text = adapter.generate(request).await?;
        Ok(Generation::new(text, adapter.kind()))
    }
}

#[async_trait]
impl GenerativeClient for RoutingGateway {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> Result<Generation, GatewayError> {
        let result = tokio::select! {
            result = self.call(&request) => result,
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
        };

        match result {
            Ok(generation) => Ok(generation),
            Err(e) if e.is_cancellation() => Err(e),
            Err(e) => {
                warn!(
                    purpose = %request.purpose,
                    model = %request.model,
                    "Provider call failed, answering with dummy: {}",
                    e
                );
                let text = self.dummy.generate(&request).await?;
                Ok(Generation::new(text, ProviderKind::Dummy))
            }
        }
    }
}

#[async_trait]
impl TokenEstimator for RoutingGateway {
    async fn estimate(&self, model: &ModelSpec, messages: &[Message]) -> Result<u32, GatewayError> {
        self.resolve(model)?.count_tokens(model, messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::Purpose;
    use roundtable_domain::Role;
    use std::time::Duration;

    // -- Mock ProviderAdapter --------------------------------------------------

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct MockProvider {
        kind: ProviderKind,
        behavior: Behavior,
    }

    impl MockProvider {
        fn new(kind: ProviderKind, behavior: Behavior) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self { kind, behavior })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GatewayError> {
            match self.behavior {
                Behavior::Reply(text) => Ok(text.to_string()),
                Behavior::Fail => Err(GatewayError::HttpStatus {
                    provider: self.kind,
                    status: 500,
                    body: "boom".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("late".to_string())
                }
            }
        }

        async fn count_tokens(
            &self,
            _model: &ModelSpec,
            messages: &[Message],
        ) -> Result<u32, GatewayError> {
            Ok(messages.len() as u32 * 10)
        }
    }

    fn request(provider: ProviderKind) -> GenerationRequest {
        GenerationRequest::new(
            Purpose::Responder(Role::Solver),
            ModelSpec::new(provider, "m"),
            vec![Message::user("hello")],
        )
    }

    #[tokio::test]
    async fn test_routes_by_provider() {
        let gateway = RoutingGateway::new(vec![
            MockProvider::new(ProviderKind::OpenAi, Behavior::Reply("from openai")),
            MockProvider::new(ProviderKind::Xai, Behavior::Reply("from xai")),
        ]);

        let generation = gateway
            .generate(request(ProviderKind::Xai), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(generation.text, "from xai");
        assert_eq!(generation.provider, ProviderKind::Xai);
    }

    #[tokio::test]
    async fn test_disabled_provider_falls_back_to_dummy() {
        let gateway = RoutingGateway::new(vec![]);
        let generation = gateway
            .generate(request(ProviderKind::Anthropic), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(generation.provider, ProviderKind::Dummy);
        assert_eq!(generation.text, DummyProvider::reply(&[Message::user("hello")]));
    }

    #[tokio::test]
    async fn test_failed_call_falls_back_to_dummy() {
        let gateway = RoutingGateway::new(vec![MockProvider::new(
            ProviderKind::OpenAi,
            Behavior::Fail,
        )]);
        let generation = gateway
            .generate(request(ProviderKind::OpenAi), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(generation.provider, ProviderKind::Dummy);
    }

    #[tokio::test]
    async fn test_cancellation_is_not_rerouted() {
        let gateway = RoutingGateway::new(vec![MockProvider::new(
            ProviderKind::OpenAi,
            Behavior::Hang,
        )]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = gateway.generate(request(ProviderKind::OpenAi), cancel).await;
        assert_eq!(result, Err(GatewayError::Cancelled));
    }

    #[tokio::test]
    async fn test_estimate_delegates_to_adapter() {
        let gateway = RoutingGateway::new(vec![MockProvider::new(
            ProviderKind::Anthropic,
            Behavior::Reply(""),
        )]);
        let messages = vec![Message::system("s"), Message::user("u")];

        let anthropic = ModelSpec::new(ProviderKind::Anthropic, "m");
        assert_eq!(gateway.estimate(&anthropic, &messages).await, Ok(20));
        assert_eq!(gateway.estimate(&ModelSpec::dummy(), &messages).await, Ok(0));
        assert_eq!(
            gateway
                .estimate(&ModelSpec::new(ProviderKind::Xai, "m"), &messages)
                .await,
            Err(GatewayError::ProviderDisabled(ProviderKind::Xai))
        );
    }

    #[test]
    fn test_from_config_defaults_to_no_providers() {
        let gateway = RoutingGateway::from_config(&FileProvidersConfig::default());
        assert!(gateway.enabled().is_empty());
    }
}
