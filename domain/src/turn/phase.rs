//! Turn lifecycle state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a comparison turn
///
/// ```text
/// Idle -> Dispatched -> PartiallyResolved -> Judging -> Resolved
///              |                 |              |
///              +-----------------+--------------+--> Failed / TimedOut
/// ```
///
/// `Failed` and `TimedOut` are absorbing: once a turn is terminal, late
/// events must be ignored rather than applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Created, not yet dispatched
    Idle,
    /// Fan-out started, no results yet
    Dispatched,
    /// At least one provider result has arrived
    PartiallyResolved,
    /// All providers settled, judge running
    Judging,
    /// Terminal: turn complete (with or without a verdict)
    Resolved,
    /// Terminal: transport-level failure
    Failed,
    /// Terminal: watchdog fired
    TimedOut,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Dispatched => "dispatched",
            TurnPhase::PartiallyResolved => "partially-resolved",
            TurnPhase::Judging => "judging",
            TurnPhase::Resolved => "resolved",
            TurnPhase::Failed => "failed",
            TurnPhase::TimedOut => "timed-out",
        }
    }

    /// Whether the turn stopped accepting events
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnPhase::Resolved | TurnPhase::Failed | TurnPhase::TimedOut
        )
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(TurnPhase::Resolved.is_terminal());
        assert!(TurnPhase::Failed.is_terminal());
        assert!(TurnPhase::TimedOut.is_terminal());
        assert!(!TurnPhase::Judging.is_terminal());
        assert!(!TurnPhase::Dispatched.is_terminal());
    }
}
