//! Turn entities: provider results and the per-turn aggregate.

use super::phase::TurnPhase;
use crate::provider::ProviderId;
use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One provider's answer to one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub provider: ProviderId,
    /// Resolved model name; may be empty until the first data arrives
    #[serde(default)]
    pub model: String,
    /// Accumulated text; append-only while streaming, immutable once complete
    #[serde(default)]
    pub response_text: String,
    /// Measured wall-clock latency (direct mode only)
    pub elapsed_seconds: Option<f64>,
    /// Dense rank assigned by the verdict, 1 = winner
    pub rank: Option<u32>,
    /// Judge-assigned score
    pub score: Option<f64>,
}

impl ProviderResult {
    /// Empty placeholder, seeded when the first token arrives
    pub fn pending(provider: ProviderId) -> Self {
        Self {
            provider,
            model: String::new(),
            response_text: String::new(),
            elapsed_seconds: None,
            rank: None,
            score: None,
        }
    }

    /// Complete result from a single request/response call
    pub fn complete(
        provider: ProviderId,
        model: impl Into<String>,
        response_text: impl Into<String>,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            response_text: response_text.into(),
            elapsed_seconds: Some(elapsed_seconds),
            rank: None,
            score: None,
        }
    }
}

/// Image attached to a query: opaque base64 payload plus declared MIME type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub base64: String,
    pub mime_type: String,
}

/// One user query and everything derived from it.
///
/// Owned exclusively by the orchestrator, which is the only writer. All
/// merges are keyed by provider id; arrival order is irrelevant. Once the
/// phase is terminal the turn is immutable — every mutator is a no-op on a
/// terminal turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTurn {
    pub user_text: String,
    pub image: Option<ImageAttachment>,
    /// Providers this turn was dispatched to
    pub requested: Vec<ProviderId>,
    pub phase: TurnPhase,
    pub results: HashMap<ProviderId, ProviderResult>,
    pub verdict: Option<Verdict>,
    /// Partial judge narrative, present only mid-stream before a verdict
    /// exists; stale once `verdict` is set
    pub streaming_judge_text: Option<String>,
    /// User-visible terminal message (timeout, transport error, ...)
    pub status_message: Option<String>,
}

impl ComparisonTurn {
    pub fn new(
        user_text: impl Into<String>,
        image: Option<ImageAttachment>,
        requested: Vec<ProviderId>,
    ) -> Self {
        Self {
            user_text: user_text.into(),
            image,
            requested,
            phase: TurnPhase::Idle,
            results: HashMap::new(),
            verdict: None,
            streaming_judge_text: None,
            status_message: None,
        }
    }

    /// Mark the fan-out as started
    pub fn dispatch(&mut self) {
        if self.phase == TurnPhase::Idle {
            self.phase = TurnPhase::Dispatched;
        }
    }

    /// Append streamed content to one provider's accumulating text.
    ///
    /// Seeds an empty result on first token. Returns false (no-op) for
    /// terminal turns and providers outside the requested set.
    pub fn append_token(&mut self, provider: ProviderId, content: &str) -> bool {
        if self.phase.is_terminal() || !self.requested.contains(&provider) {
            return false;
        }
        self.results
            .entry(provider)
            .or_insert_with(|| ProviderResult::pending(provider))
            .response_text
            .push_str(content);
        self.mark_partially_resolved();
        true
    }

    /// Replace/seed one provider's full result in one step.
    ///
    /// Last-writer-per-key: replaces only this provider's entry, never any
    /// other. Returns false for terminal turns and unrequested providers.
    pub fn merge_result(&mut self, result: ProviderResult) -> bool {
        if self.phase.is_terminal() || !self.requested.contains(&result.provider) {
            return false;
        }
        self.results.insert(result.provider, result);
        self.mark_partially_resolved();
        true
    }

    /// Append to the judge narrative-in-progress.
    ///
    /// Ignored once a verdict exists (the narrative is superseded).
    pub fn append_judge_token(&mut self, token: &str) -> bool {
        if self.phase.is_terminal() || self.verdict.is_some() {
            return false;
        }
        self.streaming_judge_text
            .get_or_insert_with(String::new)
            .push_str(token);
        self.phase = TurnPhase::Judging;
        true
    }

    /// All providers settled; judge invocation starting
    pub fn begin_judging(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = TurnPhase::Judging;
        }
    }

    /// Merge the verdict: stamp rank/score onto each result, clear the
    /// stale judge narrative, and resolve the turn.
    pub fn apply_verdict(&mut self, verdict: Verdict) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        for ranking in &verdict.rankings {
            if let Some(result) = self.results.get_mut(&ranking.provider) {
                result.rank = Some(ranking.rank);
                result.score = Some(ranking.score);
            }
        }
        self.verdict = Some(verdict);
        self.streaming_judge_text = None;
        self.phase = TurnPhase::Resolved;
        true
    }

    /// Terminal: completed, with an optional user-visible message
    pub fn resolve(&mut self, message: Option<&str>) {
        if !self.phase.is_terminal() {
            self.phase = TurnPhase::Resolved;
            if let Some(message) = message {
                self.status_message = Some(message.to_string());
            }
        }
    }

    /// Terminal: transport-level failure
    pub fn fail(&mut self, message: &str) {
        if !self.phase.is_terminal() {
            self.phase = TurnPhase::Failed;
            self.status_message = Some(message.to_string());
        }
    }

    /// Terminal: watchdog fired
    pub fn time_out(&mut self, message: &str) {
        if !self.phase.is_terminal() {
            self.phase = TurnPhase::TimedOut;
            self.status_message = Some(message.to_string());
        }
    }

    /// Results ordered for display: by rank when judged, provider id
    /// otherwise (arrival order is never meaningful)
    pub fn ranked_results(&self) -> Vec<&ProviderResult> {
        let mut results: Vec<&ProviderResult> = self.results.values().collect();
        results.sort_by_key(|r| (r.rank.unwrap_or(u32::MAX), r.provider));
        results
    }

    fn mark_partially_resolved(&mut self) {
        if matches!(self.phase, TurnPhase::Dispatched | TurnPhase::Idle) {
            self.phase = TurnPhase::PartiallyResolved;
        }
    }
}
