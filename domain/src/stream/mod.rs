//! Typed events on the mediated comparison stream.
//!
//! The backend frames its response as server-sent events; infrastructure
//! decodes the framing and maps each `(event, data)` pair into a
//! [`StreamEvent`] here. Unrecognized event types and events naming unknown
//! providers map to `None` and are skipped by the caller.

use crate::provider::ProviderId;
use crate::verdict::RawVerdict;
use serde_json::Value;

/// One event on a mediated comparison stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental content for one provider's answer
    Token { provider: ProviderId, content: String },
    /// One provider's full result, replacing anything accumulated so far
    Response {
        provider: ProviderId,
        model: String,
        response: String,
    },
    /// Final verdict for the turn (raw; normalized by the reducer)
    Evaluation(RawVerdict),
    /// Incremental judge narrative
    JudgeToken(String),
    /// Advisory query classification, status only
    Classification { query_type: String },
    /// Stream finished successfully
    Complete,
    /// Stream failed; terminal
    Error(String),
}

impl StreamEvent {
    /// Map a decoded SSE frame into a typed event.
    ///
    /// Returns `None` for unrecognized event types and for `token`/`response`
    /// frames whose provider is not in the catalog; callers skip those
    /// without failing the stream.
    pub fn from_frame(event: &str, data: &Value) -> Option<StreamEvent> {
        match event {
            "token" => {
                let provider = str_field(data, "provider")?.parse().ok()?;
                let content = str_field(data, "content")?.to_string();
                Some(StreamEvent::Token { provider, content })
            }
            "response" => {
                let provider = str_field(data, "provider")?.parse().ok()?;
                Some(StreamEvent::Response {
                    provider,
                    model: str_field(data, "model").unwrap_or_default().to_string(),
                    response: str_field(data, "response").unwrap_or_default().to_string(),
                })
            }
            "evaluation" | "judge" => {
                let raw: RawVerdict = serde_json::from_value(data.clone()).ok()?;
                Some(StreamEvent::Evaluation(raw))
            }
            "judge_token" => {
                let token = str_field(data, "content").or_else(|| str_field(data, "token"))?;
                Some(StreamEvent::JudgeToken(token.to_string()))
            }
            "classification" => Some(StreamEvent::Classification {
                query_type: str_field(data, "queryType")
                    .unwrap_or("general")
                    .to_string(),
            }),
            "complete" => Some(StreamEvent::Complete),
            "error" => {
                let message = str_field(data, "message")
                    .or_else(|| str_field(data, "error"))
                    .unwrap_or("Unknown error");
                Some(StreamEvent::Error(message.to_string()))
            }
            _ => None,
        }
    }

    /// Whether this event ends stream processing
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete | StreamEvent::Error(_))
    }
}

fn str_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}
