//! Turn observation port
//!
//! Callback interface for presenting turn progress. Implementations live in
//! the binary (console rendering); every method defaults to a no-op so
//! observers implement only what they display.

use arena_domain::{ProviderId, ProviderResult, Verdict};

/// Callbacks fired while a comparison turn runs
pub trait TurnObserver: Send + Sync {
    /// Incremental content for one provider's answer
    fn on_token(&self, _provider: ProviderId, _content: &str) {}

    /// One provider's complete result
    fn on_result(&self, _result: &ProviderResult) {}

    /// One provider failed; the fan-out continues without it
    fn on_provider_failed(&self, _provider: ProviderId, _message: &str) {}

    /// Advisory status (classification, phase changes)
    fn on_status(&self, _message: &str) {}

    /// Incremental judge narrative
    fn on_judge_token(&self, _token: &str) {}

    /// Final verdict for the turn
    fn on_verdict(&self, _verdict: &Verdict) {}
}

/// No-op observer for when progress display is not needed
pub struct NoObserver;

impl TurnObserver for NoObserver {}
