//! Comparison turn: one user query and everything derived from it.

pub mod entities;
pub mod phase;
pub mod reducer;

use serde::{Deserialize, Serialize};

/// How a turn reaches the providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnMode {
    /// Provider APIs are called directly with user-supplied credentials
    Direct,
    /// A backend fans out the query and streams results back
    Mediated,
}

impl std::fmt::Display for TurnMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnMode::Direct => write!(f, "direct"),
            TurnMode::Mediated => write!(f, "mediated"),
        }
    }
}
