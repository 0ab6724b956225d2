//! On-disk credential store.
//!
//! Per-provider API keys live in a single JSON file under the user's config
//! directory. A missing file is an empty map; the parent directory is
//! created on first save.

use arena_application::ports::credential_store::{
    CredentialMap, CredentialStore, CredentialStoreError,
};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Credential store backed by a JSON file
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<config dir>/model-arena/credentials.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("model-arena").join("credentials.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<CredentialMap, CredentialStoreError> {
        if !self.path.exists() {
            debug!("No credential file at {}", self.path.display());
            return Ok(CredentialMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| CredentialStoreError::Format(e.to_string()))
    }

    fn save(&self, credentials: &CredentialMap) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(credentials)
            .map_err(|e| CredentialStoreError::Format(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
