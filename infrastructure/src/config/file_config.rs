//! Configuration file schema.

use arena_domain::ProviderId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: BackendConfig,
    pub direct: DirectConfig,
    pub comparison: ComparisonConfig,
    pub credentials: CredentialsConfig,
    pub auth: AuthConfig,
}

/// Mediated backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// Value sent in the `X-Platform` header
    pub platform: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://thinkoff-concierge-594749896867.us-central1.run.app".to_string(),
            platform: "cli".to_string(),
            timeout_secs: 45,
        }
    }
}

/// Direct-mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConfig {
    pub timeout_secs: u64,
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Default comparison shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub providers: Vec<ProviderId>,
    pub judge: ProviderId,
    pub enable_judge: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            providers: ProviderId::default_selection(),
            judge: ProviderId::default_judge(),
            enable_judge: true,
        }
    }
}

/// Credential store location override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub path: Option<PathBuf>,
}

/// Backend session identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub user_id: Option<String>,
    /// Environment variable read for the session token
    pub token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            token_env: "ARENA_AUTH_TOKEN".to_string(),
        }
    }
}
