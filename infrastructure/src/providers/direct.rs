//! HTTP adapter for direct provider calls.
//!
//! Speaks each provider's wire dialect over a shared `reqwest` client and
//! measures wall-clock latency per call. Non-2xx responses surface the
//! response body as the error message so credential and quota problems are
//! visible to the user.

use super::wire::{
    AnthropicRequest, AnthropicResponse, ChatRequest, ChatResponse, ChatStreamChunk,
    GoogleRequest, GoogleResponse,
};
use crate::backend::sse::SseDecoder;
use arena_application::ports::provider_gateway::{ProviderError, ProviderGateway};
use arena_domain::{Dialect, DirectEndpoint, ProviderId, ProviderResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider gateway over plain HTTPS
pub struct HttpProviderGateway {
    client: reqwest::Client,
}

impl HttpProviderGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(provider: ProviderId) -> Result<DirectEndpoint, ProviderError> {
        provider.direct_endpoint().ok_or_else(|| {
            ProviderError::new(provider, "provider has no direct endpoint")
        })
    }

    async fn send_openai_chat(
        &self,
        provider: ProviderId,
        endpoint: &DirectEndpoint,
        prompt: &str,
        credential: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(endpoint.url)
            .bearer_auth(credential)
            .json(&ChatRequest::user(endpoint.model, prompt, false))
            .send()
            .await
            .map_err(|e| ProviderError::new(provider, e.to_string()))?;
        let body: ChatResponse = Self::read_json(provider, response).await?;
        Ok(body.text())
    }

    async fn send_anthropic(
        &self,
        provider: ProviderId,
        endpoint: &DirectEndpoint,
        prompt: &str,
        credential: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(endpoint.url)
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&AnthropicRequest::user(endpoint.model, prompt))
            .send()
            .await
            .map_err(|e| ProviderError::new(provider, e.to_string()))?;
        let body: AnthropicResponse = Self::read_json(provider, response).await?;
        Ok(body.text())
    }

    async fn send_google(
        &self,
        provider: ProviderId,
        endpoint: &DirectEndpoint,
        prompt: &str,
        credential: &str,
    ) -> Result<String, ProviderError> {
        // Google takes the model in the path and the key as a query param
        let url = format!("{}/{}:generateContent", endpoint.url, endpoint.model);
        let response = self
            .client
            .post(url)
            .query(&[("key", credential)])
            .json(&GoogleRequest::user(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::new(provider, e.to_string()))?;
        let body: GoogleResponse = Self::read_json(provider, response).await?;
        Ok(body.text())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        provider: ProviderId,
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                provider,
                format!("{status}: {body}"),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::new(provider, format!("invalid response: {e}")))
    }
}

impl Default for HttpProviderGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn invoke(
        &self,
        provider: ProviderId,
        prompt: &str,
        credential: &str,
    ) -> Result<ProviderResult, ProviderError> {
        let endpoint = Self::endpoint(provider)?;
        debug!("Calling {} ({})", provider, endpoint.model);
        let started = Instant::now();

        let text = match endpoint.dialect {
            Dialect::OpenAiChat => {
                self.send_openai_chat(provider, &endpoint, prompt, credential)
                    .await?
            }
            Dialect::AnthropicMessages => {
                self.send_anthropic(provider, &endpoint, prompt, credential)
                    .await?
            }
            Dialect::GoogleGenerateContent => {
                self.send_google(provider, &endpoint, prompt, credential)
                    .await?
            }
        };

        Ok(ProviderResult::complete(
            provider,
            endpoint.model,
            text,
            started.elapsed().as_secs_f64(),
        ))
    }

    async fn invoke_streaming(
        &self,
        provider: ProviderId,
        prompt: &str,
        credential: &str,
        chunks: mpsc::Sender<String>,
    ) -> Result<ProviderResult, ProviderError> {
        let endpoint = Self::endpoint(provider)?;
        if endpoint.dialect != Dialect::OpenAiChat {
            // no streaming wire support for this dialect
            let result = self.invoke(provider, prompt, credential).await?;
            let _ = chunks.send(result.response_text.clone()).await;
            return Ok(result);
        }

        debug!("Streaming from {} ({})", provider, endpoint.model);
        let started = Instant::now();
        let response = self
            .client
            .post(endpoint.url)
            .bearer_auth(credential)
            .json(&ChatRequest::user(endpoint.model, prompt, true))
            .send()
            .await
            .map_err(|e| ProviderError::new(provider, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(provider, format!("{status}: {body}")));
        }

        // the token stream is SSE-framed: `data: {...}` blocks ending with
        // `data: [DONE]`
        let mut full = String::new();
        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(bytes) = stream.next().await {
            let bytes = bytes.map_err(|e| ProviderError::new(provider, e.to_string()))?;
            for frame in decoder.push(&bytes) {
                if frame.data == "[DONE]" {
                    continue;
                }
                match serde_json::from_str::<ChatStreamChunk>(&frame.data) {
                    Ok(chunk) => {
                        if let Some(token) = chunk.token() {
                            full.push_str(&token);
                            let _ = chunks.send(token).await;
                        }
                    }
                    Err(e) => warn!("Skipping malformed stream chunk: {}", e),
                }
            }
        }

        Ok(ProviderResult::complete(
            provider,
            endpoint.model,
            full,
            started.elapsed().as_secs_f64(),
        ))
    }
}
