//! Application layer for model-arena
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; adapters for the ports live in infrastructure.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    comparison_stream::{CompareRequest, ComparisonStream, StreamError},
    credential_store::{CredentialMap, CredentialStore, CredentialStoreError},
    observer::{NoObserver, TurnObserver},
    provider_gateway::{ProviderError, ProviderGateway},
    usage::{NoUsage, UsageObserver},
};
pub use use_cases::judge::{JudgeError, JudgePolicy, JudgeUseCase};
pub use use_cases::run_comparison::{
    AuthContext, RunComparisonError, RunComparisonUseCase, Timeouts, TurnRequest,
};
