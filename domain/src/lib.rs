//! Domain layer for model-arena
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Comparison Turn
//!
//! A turn is one user query fanned out to several LLM providers. Partial and
//! complete answers are merged into a single per-turn state object, keyed by
//! provider, and an AI judge ranks the collected answers once the fan-out
//! settles.
//!
//! ## Direct / Mediated
//!
//! - **Direct**: provider APIs are called with user-supplied credentials
//! - **Mediated**: a backend fans the query out and streams results back

pub mod prompt;
pub mod provider;
pub mod stream;
pub mod turn;
pub mod verdict;

// Re-export commonly used types
pub use prompt::judge_prompt;
pub use provider::{
    Dialect, DirectEndpoint, ProviderId, ProviderInfo, UnknownProvider, catalog,
};
pub use stream::StreamEvent;
pub use turn::{
    entities::{ComparisonTurn, ImageAttachment, ProviderResult},
    phase::TurnPhase,
    reducer::{Applied, apply_event},
    TurnMode,
};
pub use verdict::{
    Ranking, RawRanking, RawVerdict, Verdict,
    parsing::{extract_json_object, parse_judge_response},
};
