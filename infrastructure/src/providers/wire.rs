//! Wire formats for the three direct-call dialects.

use serde::{Deserialize, Serialize};

pub const MAX_TOKENS: u32 = 2048;

// ==================== OpenAI-compatible chat completions ====================

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub fn user(model: &'a str, content: &'a str, stream: bool) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            max_tokens: MAX_TOKENS,
            stream,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatResponse {
    pub fn text(mut self) -> String {
        self.choices
            .drain(..)
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .unwrap_or_default()
    }
}

/// One `data:` chunk of an OpenAI-compatible token stream
#[derive(Debug, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub choices: Vec<ChatStreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatStreamChoice {
    pub delta: Option<ChatDelta>,
}

#[derive(Debug, Deserialize)]
pub struct ChatDelta {
    pub content: Option<String>,
}

impl ChatStreamChunk {
    pub fn token(mut self) -> Option<String> {
        self.choices
            .drain(..)
            .next()
            .and_then(|c| c.delta)
            .and_then(|d| d.content)
    }
}

// ==================== Anthropic messages ====================

#[derive(Debug, Serialize)]
pub struct AnthropicRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> AnthropicRequest<'a> {
    pub fn user(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            max_tokens: MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    #[serde(default)]
    pub text: String,
}

impl AnthropicResponse {
    pub fn text(mut self) -> String {
        self.content
            .drain(..)
            .next()
            .map(|c| c.text)
            .unwrap_or_default()
    }
}

// ==================== Google generateContent ====================

#[derive(Debug, Serialize)]
pub struct GoogleRequest<'a> {
    pub contents: Vec<GoogleContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GoogleContent<'a> {
    pub parts: Vec<GooglePart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GooglePart<'a> {
    pub text: &'a str,
}

impl<'a> GoogleRequest<'a> {
    pub fn user(text: &'a str) -> Self {
        Self {
            contents: vec![GoogleContent {
                parts: vec![GooglePart { text }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCandidate {
    pub content: Option<GoogleResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleResponseContent {
    #[serde(default)]
    pub parts: Vec<GoogleResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleResponsePart {
    #[serde(default)]
    pub text: String,
}

impl GoogleResponse {
    pub fn text(mut self) -> String {
        self.candidates
            .drain(..)
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default()
    }
}
