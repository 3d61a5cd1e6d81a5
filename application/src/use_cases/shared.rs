//! Shared utilities for use cases and model-backed adapters.

use crate::ports::generative_client::{GatewayError, Generation, GenerationRequest, GenerativeClient};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Generate with a deadline.
///
/// The call and the timer are two branches of one wait; when the timer
/// wins the call's token is cancelled and [`GatewayError::Timeout`] returned.
pub async fn generate_with_timeout(
    client: &dyn GenerativeClient,
    request: GenerationRequest,
    timeout: Duration,
) -> Result<Generation, GatewayError> {
    let cancel = CancellationToken::new();
    tokio::select! {
        result = client.generate(request, cancel.clone()) => result,
        _ = tokio::time::sleep(timeout) => {
            cancel.cancel();
            Err(GatewayError::Timeout)
        }
    }
}
