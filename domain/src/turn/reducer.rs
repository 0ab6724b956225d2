//! Stream event reducer.
//!
//! Pure state-machine step for mediated turns: one [`StreamEvent`] in, one
//! mutation of the [`ComparisonTurn`] out, with the outcome reported so the
//! orchestrator can notify observers and emit the usage signal. The reducer
//! is the single synchronization point for mediated state; it never touches
//! I/O.

use super::entities::{ComparisonTurn, ProviderResult};
use crate::provider::ProviderId;
use crate::stream::StreamEvent;
use crate::verdict::Verdict;

/// What a reducer step did to the turn
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Token appended to this provider's accumulating text
    TokenAppended(ProviderId),
    /// Full result merged for this provider
    ResultMerged(ProviderId),
    /// Judge narrative extended
    JudgeDelta,
    /// Advisory status, no state mutation
    StatusNoted(String),
    /// Verdict normalized and merged; turn resolved
    VerdictApplied,
    /// Stream completed; turn resolved
    Completed,
    /// Stream failed; turn failed
    Failed(String),
    /// Event arrived for a terminal turn (or an unrequested provider) and
    /// was discarded
    Ignored,
}

/// Apply one stream event to the turn.
///
/// Events against a terminal turn are ignored, never misapplied: a late
/// `response` after a timeout is a no-op.
pub fn apply_event(turn: &mut ComparisonTurn, event: StreamEvent) -> Applied {
    if turn.phase.is_terminal() {
        return Applied::Ignored;
    }

    match event {
        StreamEvent::Token { provider, content } => {
            if turn.append_token(provider, &content) {
                Applied::TokenAppended(provider)
            } else {
                Applied::Ignored
            }
        }
        StreamEvent::Response {
            provider,
            model,
            response,
        } => {
            let mut result = ProviderResult::pending(provider);
            result.model = model;
            result.response_text = response;
            if turn.merge_result(result) {
                Applied::ResultMerged(provider)
            } else {
                Applied::Ignored
            }
        }
        StreamEvent::Evaluation(raw) => {
            let candidates: Vec<ProviderId> = {
                // rank what actually answered; fall back to the requested
                // set when the verdict precedes any response event
                let mut ids: Vec<ProviderId> = turn.results.keys().copied().collect();
                if ids.is_empty() {
                    ids = turn.requested.clone();
                }
                ids.sort_unstable();
                ids
            };
            match Verdict::from_raw(raw, &candidates) {
                Some(verdict) => {
                    if turn.apply_verdict(verdict) {
                        Applied::VerdictApplied
                    } else {
                        Applied::Ignored
                    }
                }
                None => Applied::Ignored,
            }
        }
        StreamEvent::JudgeToken(token) => {
            if turn.append_judge_token(&token) {
                Applied::JudgeDelta
            } else {
                Applied::Ignored
            }
        }
        StreamEvent::Classification { query_type } => Applied::StatusNoted(query_type),
        StreamEvent::Complete => {
            turn.resolve(None);
            Applied::Completed
        }
        StreamEvent::Error(message) => {
            turn.fail(&message);
            Applied::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::phase::TurnPhase;
    use crate::verdict::{RawRanking, RawVerdict};

    fn turn() -> ComparisonTurn {
        let mut t = ComparisonTurn::new(
            "2+2",
            None,
            vec![ProviderId::OpenAi, ProviderId::Anthropic],
        );
        t.dispatch();
        t
    }

    fn token(provider: ProviderId, content: &str) -> StreamEvent {
        StreamEvent::Token {
            provider,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_tokens_then_complete_without_response_event() {
        let mut t = turn();
        apply_event(&mut t, token(ProviderId::OpenAi, "2+2 "));
        apply_event(&mut t, token(ProviderId::OpenAi, "equals "));
        apply_event(&mut t, token(ProviderId::OpenAi, "4"));
        assert_eq!(apply_event(&mut t, StreamEvent::Complete), Applied::Completed);

        assert_eq!(t.phase, TurnPhase::Resolved);
        assert_eq!(t.results[&ProviderId::OpenAi].response_text, "2+2 equals 4");
    }

    #[test]
    fn test_response_replaces_accumulated_tokens() {
        let mut t = turn();
        apply_event(&mut t, token(ProviderId::OpenAi, "partial"));
        apply_event(
            &mut t,
            StreamEvent::Response {
                provider: ProviderId::OpenAi,
                model: "gpt-4o".to_string(),
                response: "final text".to_string(),
            },
        );
        assert_eq!(t.results[&ProviderId::OpenAi].response_text, "final text");
        assert_eq!(t.results[&ProviderId::OpenAi].model, "gpt-4o");
    }

    #[test]
    fn test_evaluation_resolves_with_normalized_verdict() {
        let mut t = turn();
        apply_event(
            &mut t,
            StreamEvent::Response {
                provider: ProviderId::OpenAi,
                model: "m1".to_string(),
                response: "a".to_string(),
            },
        );
        apply_event(
            &mut t,
            StreamEvent::Response {
                provider: ProviderId::Anthropic,
                model: "m2".to_string(),
                response: "b".to_string(),
            },
        );

        // judge forgot anthropic; repair appends it
        let raw = RawVerdict {
            winner: Some("openai".to_string()),
            reasoning: Some("clearer".to_string()),
            rankings: Some(vec![RawRanking {
                provider: "openai".to_string(),
                rank: Some(1),
                score: Some(9.0),
            }]),
        };
        assert_eq!(
            apply_event(&mut t, StreamEvent::Evaluation(raw)),
            Applied::VerdictApplied
        );

        let verdict = t.verdict.as_ref().unwrap();
        assert!(verdict.has_dense_ranks());
        assert_eq!(verdict.rankings.len(), 2);
        assert_eq!(t.results[&ProviderId::Anthropic].score, Some(5.0));
    }

    #[test]
    fn test_late_event_after_timeout_ignored() {
        let mut t = turn();
        t.time_out("Request timed out.");
        let applied = apply_event(
            &mut t,
            StreamEvent::Response {
                provider: ProviderId::OpenAi,
                model: "gpt-4o".to_string(),
                response: "too late".to_string(),
            },
        );
        assert_eq!(applied, Applied::Ignored);
        assert!(t.results.is_empty());
        assert_eq!(t.phase, TurnPhase::TimedOut);
    }

    #[test]
    fn test_error_event_fails_turn() {
        let mut t = turn();
        assert_eq!(
            apply_event(&mut t, StreamEvent::Error("backend exploded".to_string())),
            Applied::Failed("backend exploded".to_string())
        );
        assert_eq!(t.phase, TurnPhase::Failed);
        assert_eq!(t.status_message.as_deref(), Some("backend exploded"));
    }

    #[test]
    fn test_judge_tokens_move_turn_to_judging() {
        let mut t = turn();
        apply_event(&mut t, token(ProviderId::OpenAi, "a"));
        assert_eq!(
            apply_event(&mut t, StreamEvent::JudgeToken("weighing".to_string())),
            Applied::JudgeDelta
        );
        assert_eq!(t.phase, TurnPhase::Judging);
        assert_eq!(t.streaming_judge_text.as_deref(), Some("weighing"));
    }

    #[test]
    fn test_classification_is_status_only() {
        let mut t = turn();
        let applied = apply_event(
            &mut t,
            StreamEvent::Classification {
                query_type: "math".to_string(),
            },
        );
        assert_eq!(applied, Applied::StatusNoted("math".to_string()));
        assert!(t.results.is_empty());
        assert_eq!(t.phase, TurnPhase::Dispatched);
    }
}
