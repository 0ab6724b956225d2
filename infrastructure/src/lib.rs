//! Infrastructure layer for model-arena
//!
//! Adapters for the application ports: HTTP clients for direct provider
//! calls, the backend SSE client for mediated mode, the on-disk credential
//! store, and configuration loading.

pub mod backend;
pub mod config;
pub mod credentials;
pub mod providers;

// Re-export commonly used types
pub use backend::client::{BackendClient, BackendError};
pub use config::{file_config::FileConfig, loader::ConfigLoader};
pub use credentials::JsonCredentialStore;
pub use providers::direct::HttpProviderGateway;
