//! Usage accounting port
//!
//! Mediated comparisons consume one credit each. The use case fires this
//! signal exactly once per evaluated turn; the adapter (or a local counter)
//! owns the balance.

/// Observer for credit consumption
pub trait UsageObserver: Send + Sync {
    /// A mediated comparison was evaluated and charged one credit
    fn on_comparison_charged(&self) {}
}

/// No-op usage observer
pub struct NoUsage;

impl UsageObserver for NoUsage {}
