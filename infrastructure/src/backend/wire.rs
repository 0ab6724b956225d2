//! Backend HTTP wire formats (camelCase JSON).

use arena_domain::ProviderId;
use serde::{Deserialize, Serialize};

// ==================== Session ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest<'a> {
    pub user_id: &'a str,
    pub platform: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(default)]
    pub credits: Option<CreditBalance>,
    #[serde(default)]
    pub tier: Option<String>,
    /// `None` means the user has never been asked about sync
    #[serde(default)]
    pub sync_enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    #[serde(default)]
    pub current_balance: i64,
}

/// Session state as the application sees it
#[derive(Debug, Clone)]
pub struct Session {
    pub credits: i64,
    pub tier: String,
    pub sync_enabled: Option<bool>,
}

impl From<SessionResponse> for Session {
    fn from(response: SessionResponse) -> Self {
        Session {
            credits: response.credits.map(|c| c.current_balance).unwrap_or(0),
            tier: response.tier.unwrap_or_else(|| "free".to_string()),
            sync_enabled: response.sync_enabled,
        }
    }
}

// ==================== Comparison stream ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareStreamRequest<'a> {
    pub user_id: &'a str,
    pub message: &'a str,
    pub providers: &'a [ProviderId],
    pub enable_judge: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_provider: Option<ProviderId>,
    /// Raw base64; the backend adds the data-URL prefix itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<&'a str>,
}

// ==================== Settings ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest<'a> {
    pub user_id: &'a str,
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub sync_enabled: bool,
}

// ==================== Nicknames ====================

#[derive(Debug, Deserialize)]
pub struct NicknameCheckResponse {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NicknameRegisterRequest<'a> {
    pub user_id: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct NicknameRegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NicknameResponse {
    #[serde(default)]
    pub nickname: Option<String>,
}

// ==================== Direct messages ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessageRequest<'a> {
    pub user_id: &'a str,
    pub message: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub metadata: MessageMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct MessageMetadata<'a> {
    pub platform: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessageResponse {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageRequest<'a> {
    pub from_user_id: &'a str,
    pub to_nickname: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageResponse {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    pub id: String,
    pub from_user_id: String,
    #[serde(default)]
    pub from_nickname: String,
    pub to_user_id: String,
    #[serde(default)]
    pub to_nickname: String,
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InboxResponse {
    #[serde(default)]
    pub messages: Vec<InboxMessage>,
}
