//! Credential store port
//!
//! Per-provider API keys for direct mode. Loaded once per turn so a key
//! edit mid-flight never splits a fan-out across two credential sets.

use arena_domain::ProviderId;
use std::collections::HashMap;
use thiserror::Error;

/// Provider id -> API key
pub type CredentialMap = HashMap<ProviderId, String>;

#[derive(Error, Debug)]
pub enum CredentialStoreError {
    #[error("credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store format error: {0}")]
    Format(String),
}

/// Persistent per-provider credentials
pub trait CredentialStore: Send + Sync {
    /// Load all stored credentials. A missing store is an empty map, not an
    /// error.
    fn load(&self) -> Result<CredentialMap, CredentialStoreError>;

    /// Persist the full credential map, replacing what was stored.
    fn save(&self, credentials: &CredentialMap) -> Result<(), CredentialStoreError>;
}
