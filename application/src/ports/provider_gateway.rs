//! Provider gateway port
//!
//! Defines the interface for invoking a single LLM provider directly with a
//! user-supplied credential. Implementations live in the infrastructure
//! layer (HTTP adapters speaking each provider's dialect).

use arena_domain::{ProviderId, ProviderResult};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error from a single provider invocation
///
/// Carries the provider so a fan-out can attribute failures without
/// inspecting the message.
#[derive(Error, Debug, Clone)]
#[error("{provider}: {message}")]
pub struct ProviderError {
    pub provider: ProviderId,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderId, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Gateway for direct provider calls
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Send one prompt and return the complete result, with latency measured
    /// by the adapter.
    async fn invoke(
        &self,
        provider: ProviderId,
        prompt: &str,
        credential: &str,
    ) -> Result<ProviderResult, ProviderError>;

    /// Send one prompt, forwarding incremental text chunks to `chunks` as
    /// they arrive, and return the complete result.
    ///
    /// The default delegates to [`ProviderGateway::invoke`] and delivers the
    /// whole answer as one chunk; adapters override this for dialects that
    /// support streaming.
    async fn invoke_streaming(
        &self,
        provider: ProviderId,
        prompt: &str,
        credential: &str,
        chunks: mpsc::Sender<String>,
    ) -> Result<ProviderResult, ProviderError> {
        let result = self.invoke(provider, prompt, credential).await?;
        let _ = chunks.send(result.response_text.clone()).await;
        Ok(result)
    }
}
