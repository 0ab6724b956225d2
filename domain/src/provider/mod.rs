//! Provider catalog: identifiers, display metadata, direct-mode endpoints.
//!
//! The catalog is static configuration. Endpoint URLs, model identifiers,
//! and auth header conventions are fixed per provider, not negotiated at
//! runtime.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A large-language-model provider (Value Object)
///
/// Identified by a stable lowercase string id on every wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
    Grok,
    Mistral,
    Meta,
    Perplexity,
    Kimi,
}

/// Error returned when a provider id string is not in the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl ProviderId {
    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Google => "google",
            ProviderId::Grok => "grok",
            ProviderId::Mistral => "mistral",
            ProviderId::Meta => "meta",
            ProviderId::Perplexity => "perplexity",
            ProviderId::Kimi => "kimi",
        }
    }

    /// All providers in the catalog, in display order
    pub fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenAi,
            ProviderId::Anthropic,
            ProviderId::Google,
            ProviderId::Grok,
            ProviderId::Mistral,
            ProviderId::Meta,
            ProviderId::Perplexity,
            ProviderId::Kimi,
        ]
    }

    /// Default provider selection for a comparison
    pub fn default_selection() -> Vec<ProviderId> {
        vec![
            ProviderId::OpenAi,
            ProviderId::Anthropic,
            ProviderId::Google,
            ProviderId::Grok,
        ]
    }

    /// The designated default judge
    pub fn default_judge() -> ProviderId {
        ProviderId::Mistral
    }

    /// Direct-mode endpoint configuration, if this provider can be called
    /// directly from the client. Providers without an entry are reachable
    /// only in mediated mode.
    pub fn direct_endpoint(&self) -> Option<DirectEndpoint> {
        let endpoint = match self {
            ProviderId::OpenAi => DirectEndpoint {
                url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-4o",
                dialect: Dialect::OpenAiChat,
            },
            ProviderId::Anthropic => DirectEndpoint {
                url: "https://api.anthropic.com/v1/messages",
                model: "claude-sonnet-4-20250514",
                dialect: Dialect::AnthropicMessages,
            },
            ProviderId::Google => DirectEndpoint {
                url: "https://generativelanguage.googleapis.com/v1beta/models",
                model: "gemini-2.5-flash",
                dialect: Dialect::GoogleGenerateContent,
            },
            ProviderId::Grok => DirectEndpoint {
                url: "https://api.x.ai/v1/chat/completions",
                model: "grok-3",
                dialect: Dialect::OpenAiChat,
            },
            ProviderId::Mistral => DirectEndpoint {
                url: "https://api.mistral.ai/v1/chat/completions",
                model: "mistral-large-latest",
                dialect: Dialect::OpenAiChat,
            },
            _ => return None,
        };
        Some(endpoint)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAi),
            "anthropic" => Ok(ProviderId::Anthropic),
            "google" => Ok(ProviderId::Google),
            "grok" => Ok(ProviderId::Grok),
            "mistral" => Ok(ProviderId::Mistral),
            "meta" => Ok(ProviderId::Meta),
            "perplexity" => Ok(ProviderId::Perplexity),
            "kimi" => Ok(ProviderId::Kimi),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Wire dialect used when calling a provider directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// OpenAI-compatible chat completions (OpenAI, Grok, Mistral)
    OpenAiChat,
    /// Anthropic message list with `x-api-key` auth header
    AnthropicMessages,
    /// Google generateContent with API key as query parameter
    GoogleGenerateContent,
}

impl Dialect {
    /// Whether this dialect supports token streaming for judge calls
    pub fn supports_streaming(&self) -> bool {
        matches!(self, Dialect::OpenAiChat)
    }
}

/// Direct-mode endpoint configuration for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectEndpoint {
    /// Endpoint URL (base URL for dialects that embed the model in the path)
    pub url: &'static str,
    /// Model identifier sent on direct calls
    pub model: &'static str,
    /// Request/response translation to apply
    pub dialect: Dialect,
}

/// Display metadata for one provider
#[derive(Debug, Clone, Copy)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: &'static str,
    pub models: &'static [&'static str],
}

/// Static provider catalog with display metadata
pub fn catalog() -> &'static [ProviderInfo] {
    &[
        ProviderInfo {
            id: ProviderId::OpenAi,
            name: "OpenAI",
            models: &["gpt-5.1", "gpt-4o", "gpt-4o-mini", "o3", "o1"],
        },
        ProviderInfo {
            id: ProviderId::Anthropic,
            name: "Claude",
            models: &[
                "claude-sonnet-4-5-20250929",
                "claude-opus-4-5-20251101",
                "claude-sonnet-4-20250514",
            ],
        },
        ProviderInfo {
            id: ProviderId::Google,
            name: "Gemini",
            models: &["gemini-2.5-flash", "gemini-2.5-pro", "gemini-2.0-flash"],
        },
        ProviderInfo {
            id: ProviderId::Grok,
            name: "Grok",
            models: &["grok-3", "grok-3-fast", "grok-3-mini"],
        },
        ProviderInfo {
            id: ProviderId::Mistral,
            name: "Mistral",
            models: &[
                "mistral-large-latest",
                "mistral-medium-latest",
                "mistral-small-latest",
            ],
        },
        ProviderInfo {
            id: ProviderId::Meta,
            name: "Meta",
            models: &["llama-4-maverick-17b-128e-instruct", "llama-3.3-70b-instruct"],
        },
        ProviderInfo {
            id: ProviderId::Perplexity,
            name: "Perplexity",
            models: &["sonar-pro", "sonar", "sonar-reasoning-pro"],
        },
        ProviderInfo {
            id: ProviderId::Kimi,
            name: "Kimi",
            models: &["moonshot-v1-8k", "moonshot-v1-32k"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for provider in ProviderId::all() {
            let s = provider.to_string();
            let parsed: ProviderId = s.parse().unwrap();
            assert_eq!(*provider, parsed);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed: ProviderId = "OpenAI".parse().unwrap();
        assert_eq!(parsed, ProviderId::OpenAi);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result: Result<ProviderId, _> = "skynet".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_direct_endpoints_cover_five_providers() {
        let direct: Vec<_> = ProviderId::all()
            .iter()
            .filter(|p| p.direct_endpoint().is_some())
            .collect();
        assert_eq!(direct.len(), 5);
        assert!(ProviderId::Meta.direct_endpoint().is_none());
    }

    #[test]
    fn test_dialect_assignment() {
        assert_eq!(
            ProviderId::Grok.direct_endpoint().unwrap().dialect,
            Dialect::OpenAiChat
        );
        assert_eq!(
            ProviderId::Anthropic.direct_endpoint().unwrap().dialect,
            Dialect::AnthropicMessages
        );
        assert!(!Dialect::GoogleGenerateContent.supports_streaming());
        assert!(Dialect::OpenAiChat.supports_streaming());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ProviderId::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
        let back: ProviderId = serde_json::from_str("\"mistral\"").unwrap();
        assert_eq!(back, ProviderId::Mistral);
    }

    #[test]
    fn test_catalog_has_display_names() {
        let info = catalog()
            .iter()
            .find(|p| p.id == ProviderId::Anthropic)
            .unwrap();
        assert_eq!(info.name, "Claude");
        assert!(!info.models.is_empty());
    }
}
