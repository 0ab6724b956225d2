//! HTTP client for the mediated backend.
//!
//! Every call carries the session bearer token and an `X-Platform` header.
//! The comparison stream endpoint answers with server-sent events, decoded
//! incrementally and mapped into typed [`StreamEvent`]s.

use super::sse::{SseDecoder, SseFrame};
use super::wire::{
    CompareStreamRequest, DirectMessageRequest, DirectMessageResponse, InboxMessage,
    InboxResponse, NicknameCheckResponse, NicknameRegisterRequest, NicknameRegisterResponse,
    NicknameResponse, Session, SessionRequest, SessionResponse, Settings, SettingsRequest,
    SupportMessageRequest, SupportMessageResponse,
};
use arena_application::ports::comparison_stream::{
    CompareRequest, ComparisonStream, StreamError,
};
use arena_domain::StreamEvent;
use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors from backend REST calls
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Client for the mediated backend
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    platform: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            platform: platform.into(),
        }
    }

    fn post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("X-Platform", &self.platform)
    }

    fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("X-Platform", &self.platform)
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Initialize the session and fetch the credit balance
    pub async fn init_session(&self, user_id: &str, token: &str) -> Result<Session, BackendError> {
        let response = self
            .post("/api/session", token)
            .json(&SessionRequest {
                user_id,
                platform: &self.platform,
            })
            .send()
            .await?;
        let session: SessionResponse = Self::read(response).await?;
        Ok(session.into())
    }

    /// Persist whether settings sync is enabled for this user
    pub async fn update_sync_preference(
        &self,
        user_id: &str,
        token: &str,
        sync_enabled: bool,
    ) -> Result<(), BackendError> {
        let response = self
            .post("/api/settings", token)
            .json(&SettingsRequest {
                user_id,
                settings: Settings { sync_enabled },
            })
            .send()
            .await?;
        Self::read::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Check whether a nickname is still available
    pub async fn check_nickname(
        &self,
        nickname: &str,
    ) -> Result<(bool, Option<String>), BackendError> {
        let url = format!(
            "{}/api/nickname/check/{}",
            self.base_url,
            urlencode(nickname)
        );
        let response = self.client.get(url).send().await?;
        let check: NicknameCheckResponse = Self::read(response).await?;
        Ok((check.available, check.message))
    }

    /// Claim a nickname for this user
    pub async fn register_nickname(
        &self,
        user_id: &str,
        token: &str,
        nickname: &str,
    ) -> Result<Option<String>, BackendError> {
        let response = self
            .post("/api/nickname", token)
            .json(&NicknameRegisterRequest { user_id, nickname })
            .send()
            .await?;
        let registered: NicknameRegisterResponse = Self::read(response).await?;
        Ok(registered.message.or(registered.error))
    }

    /// Fetch this user's nickname, if one is registered
    pub async fn nickname(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<Option<String>, BackendError> {
        let response = self
            .get("/api/nickname", token)
            .query(&[("userId", user_id)])
            .send()
            .await?;
        let body: NicknameResponse = Self::read(response).await?;
        Ok(body.nickname)
    }

    /// Send a message to the support inbox; the backend may answer with AI
    pub async fn send_support_message(
        &self,
        user_id: &str,
        token: &str,
        message: &str,
    ) -> Result<SupportMessageResponse, BackendError> {
        let response = self
            .post("/api/messages/thinkoff", token)
            .json(&SupportMessageRequest {
                user_id,
                message,
                kind: "feedback",
                metadata: super::wire::MessageMetadata {
                    platform: &self.platform,
                },
            })
            .send()
            .await?;
        Self::read(response).await
    }

    /// Send a direct message to another user by nickname
    pub async fn send_direct_message(
        &self,
        user_id: &str,
        token: &str,
        to_nickname: &str,
        content: &str,
    ) -> Result<DirectMessageResponse, BackendError> {
        let response = self
            .post("/api/messages/send", token)
            .json(&DirectMessageRequest {
                from_user_id: user_id,
                to_nickname,
                content,
            })
            .send()
            .await?;
        Self::read(response).await
    }

    /// List this user's messages, newest first
    pub async fn list_messages(
        &self,
        user_id: &str,
        token: &str,
        limit: usize,
    ) -> Result<Vec<InboxMessage>, BackendError> {
        let response = self
            .get("/api/messages/list", token)
            .query(&[("userId", user_id), ("limit", &limit.to_string())])
            .send()
            .await?;
        let inbox: InboxResponse = Self::read(response).await?;
        Ok(inbox.messages)
    }

    /// Decode one SSE frame into a typed event, skipping noise.
    fn decode_frame(frame: &SseFrame) -> Option<StreamEvent> {
        let data: serde_json::Value = match serde_json::from_str(&frame.data) {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping malformed SSE data: {}", e);
                return None;
            }
        };
        let event = StreamEvent::from_frame(&frame.event, &data);
        if event.is_none() {
            debug!("Skipping unrecognized SSE event: {}", frame.event);
        }
        event
    }
}

#[async_trait]
impl ComparisonStream for BackendClient {
    async fn open(
        &self,
        request: CompareRequest,
        events: mpsc::Sender<StreamEvent>,
    ) -> Result<(), StreamError> {
        info!(
            "Opening comparison stream for {} providers",
            request.providers.len()
        );
        let body = CompareStreamRequest {
            user_id: &request.user_id,
            message: &request.message,
            providers: &request.providers,
            enable_judge: request.enable_judge,
            judge_provider: request.judge_provider,
            image_base64: request.image.as_ref().map(|i| i.base64.as_str()),
        };
        let response = self
            .post("/api/query/compare-stream", &request.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StreamError::Transport(e.to_string()))?;
            for frame in decoder.push(&chunk) {
                if let Some(event) = Self::decode_frame(&frame) {
                    let terminal = event.is_terminal();
                    if events.send(event).await.is_err() {
                        debug!("Stream receiver dropped, closing");
                        return Ok(());
                    }
                    if terminal {
                        return Ok(());
                    }
                }
            }
        }

        // tail frame without a trailing blank line, then implicit completion
        if let Some(frame) = decoder.finish() {
            if let Some(event) = Self::decode_frame(&frame) {
                let terminal = event.is_terminal();
                if events.send(event).await.is_err() || terminal {
                    return Ok(());
                }
            }
        }
        let _ = events.send(StreamEvent::Complete).await;
        Ok(())
    }
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => {
                let _ = std::fmt::Write::write_fmt(&mut out, format_args!("%{other:02X}"));
            }
        }
    }
    out
}
