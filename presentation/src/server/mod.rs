//! HTTP front end for the chat pipeline
//!
//! Routes:
//! - `POST /api/chat`: run one request (bearer-token protected when a key is set)
//! - `GET /health`: liveness probe
//! - `GET /openapi.json`: API description

pub mod auth;
pub mod dto;
pub mod openapi;

use auth::{is_authorized, mask_authorization};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dto::{ChatResponseBody, HealthBody};
use roundtable_application::{RunChatError, RunChatUseCase};
use roundtable_domain::ChatRequest;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// State shared across handlers
pub struct ServerState {
    use_case: Arc<RunChatUseCase>,
    /// Bearer token required on `/api/chat`; `None` leaves the API open
    api_key: Option<String>,
}

impl ServerState {
    pub fn new(use_case: Arc<RunChatUseCase>) -> Self {
        Self {
            use_case,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<RunChatError> for ApiError {
    fn from(e: RunChatError) -> Self {
        match e {
            RunChatError::InvalidRequest(_) => ApiError::BadRequest(e.to_string()),
            RunChatError::NoRolesEnabled { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ChatResponseBody::message(self.to_string()))).into_response()
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` fires.
pub async fn serve(
    bind: &str,
    state: Arc<ServerState>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn chat(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let masked = authorization.map(mask_authorization);

    if !is_authorized(state.api_key.as_deref(), authorization) {
        warn!(authorization = ?masked, "Rejected chat request");
        return Err(ApiError::Unauthorized);
    }

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    info!(
        source = %request.source,
        mode = %request.mode,
        user_id = %request.user.id,
        authorization = ?masked,
        "Chat request"
    );

    let outcome = state.use_case.execute(request).await.map_err(|e| {
        error!("Chat request failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(outcome.into()))
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { ok: true })
}

async fn openapi_json() -> Json<Value> {
    Json(openapi::openapi_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use roundtable_application::{
        ConfigSource, GatewayError, Generation, GenerationRequest, GenerativeClient,
        MaxTokensEstimator, OrchestrationConfig, PlanInput, Planner, StaticConfig,
        SynthesisInput, Synthesizer,
    };
    use roundtable_domain::{Plan, ProviderKind, Synthesis};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const ANSWER: &str = "- Index the foreign key\n- Batch the writes\n\nAssumptions\n- Postgres 15\n\nConfidence score: 0.9\nRisk score: 0.0";

    struct CountingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeClient for CountingClient {
        async fn generate(
            &self,
            _request: GenerationRequest,
            _cancel: CancellationToken,
        ) -> Result<Generation, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Generation::new(ANSWER, ProviderKind::Dummy))
        }
    }

    struct NoPlanner;

    #[async_trait]
    impl Planner for NoPlanner {
        async fn plan(&self, _input: PlanInput<'_>) -> Result<Plan, GatewayError> {
            Err(GatewayError::Unsupported("plan".to_string()))
        }
    }

    struct NoSynthesizer;

    #[async_trait]
    impl Synthesizer for NoSynthesizer {
        async fn synthesize(
            &self,
            _input: SynthesisInput<'_>,
        ) -> Result<Synthesis, GatewayError> {
            Err(GatewayError::Unsupported("synthesis".to_string()))
        }
    }

    fn app(api_key: Option<&str>) -> (Router, Arc<CountingClient>) {
        let client = Arc::new(CountingClient {
            calls: AtomicUsize::new(0),
        });
        let config: Arc<dyn ConfigSource> =
            Arc::new(StaticConfig::new(OrchestrationConfig::default()));
        let use_case = RunChatUseCase::new(
            client.clone(),
            Arc::new(MaxTokensEstimator),
            Arc::new(NoPlanner),
            Arc::new(NoSynthesizer),
            config,
        );
        let state =
            ServerState::new(Arc::new(use_case)).with_api_key(api_key.map(str::to_string));
        (router(Arc::new(state)), client)
    }

    fn chat_request(auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const BODY: &str = r#"{"source":"web","mode":"ask","user":{"id":"u1"},"message":"How do I speed up inserts?"}"#;

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(None);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_openapi_describes_chat() {
        let (app, _) = app(None);
        let response = app
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/chat"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_unauthorized_does_no_work() {
        let (app, client) = app(Some("topsecret"));
        let response = app
            .oneshot(chat_request(Some("Bearer wrong"), BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "reply": "Unauthorized" })
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authorized_ask_returns_reply_and_meta() {
        let (app, client) = app(Some("topsecret"));
        let response = app
            .oneshot(chat_request(Some("Bearer topsecret"), BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(!body["reply"].as_str().unwrap().is_empty());
        assert!(body["meta"]["c_final"].is_number());
        assert!(body["meta"]["budget"]["capUsd"].is_number());
        assert!(body.get("audit").is_none());
        assert!(client.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let (app, client) = app(None);
        let body = r#"{"source":"web","mode":"ask","user":{"id":"u1"},"message":"  "}"#;
        let response = app.oneshot(chat_request(None, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = app(None);
        let response = app
            .oneshot(chat_request(None, r#"{"mode":"fast"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["reply"].is_string());
    }
}
