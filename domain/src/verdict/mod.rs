//! Verdict types and normalization.
//!
//! A [`Verdict`] is the judge's final ordering of the candidate responses in
//! one turn. Raw judge output ([`RawVerdict`]) arrives either as an
//! `evaluation` stream event or parsed out of free-form judge text, and is
//! normalized so that every candidate ends up with a dense rank.

pub mod parsing;

use crate::provider::ProviderId;
use crate::turn::entities::ProviderResult;
use serde::{Deserialize, Serialize};

/// Reasoning text used when judge output could not be parsed and the
/// latency fallback was applied instead.
pub const FALLBACK_REASONING: &str =
    "Could not parse judge response. Ranked by response time.";

/// One ranked candidate in a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub provider: ProviderId,
    /// Dense rank, 1 = winner
    pub rank: u32,
    /// Judge-assigned score (0-10 by convention, not enforced)
    pub score: f64,
}

/// The judge's final ordering for one turn
///
/// Invariants (guaranteed by [`Verdict::from_raw`] and
/// [`Verdict::fallback_by_latency`]):
/// - `rankings` holds exactly one entry per candidate
/// - rank values are a permutation of `1..=N` with no ties
/// - `winner` equals the provider with rank 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub winner: ProviderId,
    pub reasoning: String,
    pub rankings: Vec<Ranking>,
}

/// One entry of a judge's `rankings` array, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRanking {
    #[serde(default)]
    pub provider: String,
    pub rank: Option<u32>,
    pub score: Option<f64>,
}

/// Judge output as it appears on the wire, before normalization
///
/// `rankings: None` means the field was absent or not a sequence, which is
/// treated as a total parse failure by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVerdict {
    pub winner: Option<String>,
    pub reasoning: Option<String>,
    pub rankings: Option<Vec<RawRanking>>,
}

/// Rank used while sorting entries whose rank the judge omitted.
/// Sorts them after every explicitly ranked entry.
const UNRANKED: u32 = 99;

/// Neutral score assigned to candidates the judge forgot to rank
const NEUTRAL_SCORE: f64 = 5.0;

impl Verdict {
    /// Normalize raw judge output against the turn's candidate set.
    ///
    /// Returns `None` when the `rankings` field is absent (total parse
    /// failure; the caller falls back to latency ordering). Otherwise:
    ///
    /// 1. entries naming unknown or non-candidate providers are dropped, as
    ///    are duplicate entries for the same provider (first occurrence wins)
    /// 2. every candidate missing from the rankings is appended with
    ///    `rank = len + 1` and a neutral score of 5.0
    /// 3. entries are sorted by rank ascending, then ranks are re-numbered
    ///    densely 1..N so a non-compliant judge cannot produce gaps or ties
    /// 4. the winner is the rank-1 provider; a contradictory `winner` field
    ///    from the judge is overridden
    pub fn from_raw(raw: RawVerdict, candidates: &[ProviderId]) -> Option<Verdict> {
        let raw_rankings = raw.rankings?;

        let mut rankings: Vec<Ranking> = Vec::with_capacity(candidates.len());
        for entry in raw_rankings {
            let Ok(provider) = entry.provider.parse::<ProviderId>() else {
                continue;
            };
            if !candidates.contains(&provider) {
                continue;
            }
            if rankings.iter().any(|r| r.provider == provider) {
                continue;
            }
            rankings.push(Ranking {
                provider,
                rank: entry.rank.unwrap_or(UNRANKED),
                score: entry.score.unwrap_or(NEUTRAL_SCORE),
            });
        }

        // Every candidate always gets a rank, even if the judge forgot it
        for candidate in candidates {
            if !rankings.iter().any(|r| r.provider == *candidate) {
                rankings.push(Ranking {
                    provider: *candidate,
                    rank: rankings.len() as u32 + 1,
                    score: NEUTRAL_SCORE,
                });
            }
        }

        rankings.sort_by_key(|r| r.rank);
        for (i, ranking) in rankings.iter_mut().enumerate() {
            ranking.rank = i as u32 + 1;
        }

        let winner = rankings.first()?.provider;
        Some(Verdict {
            winner,
            reasoning: raw.reasoning.unwrap_or_default(),
            rankings,
        })
    }

    /// Terminal error boundary for the judging step: synthesize a verdict
    /// from response latency when judge output is unusable.
    ///
    /// Fastest candidate wins; scores decrease strictly by 0.5 per rank so
    /// there are never ties. Candidates without a measured latency sort
    /// last. This never fails for a non-empty candidate list.
    pub fn fallback_by_latency(results: &[ProviderResult]) -> Option<Verdict> {
        if results.is_empty() {
            return None;
        }

        let mut ordered: Vec<&ProviderResult> = results.iter().collect();
        ordered.sort_by(|a, b| {
            let la = a.elapsed_seconds.unwrap_or(f64::INFINITY);
            let lb = b.elapsed_seconds.unwrap_or(f64::INFINITY);
            la.partial_cmp(&lb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let rankings: Vec<Ranking> = ordered
            .iter()
            .enumerate()
            .map(|(i, r)| Ranking {
                provider: r.provider,
                rank: i as u32 + 1,
                score: 9.0 - 0.5 * i as f64,
            })
            .collect();

        Some(Verdict {
            winner: rankings[0].provider,
            reasoning: FALLBACK_REASONING.to_string(),
            rankings,
        })
    }

    /// Check the dense-rank invariant: ranks are a permutation of 1..=N
    pub fn has_dense_ranks(&self) -> bool {
        let mut ranks: Vec<u32> = self.rankings.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        ranks == (1..=self.rankings.len() as u32).collect::<Vec<_>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(provider: ProviderId, elapsed: Option<f64>) -> ProviderResult {
        ProviderResult {
            provider,
            model: String::new(),
            response_text: "answer".to_string(),
            elapsed_seconds: elapsed,
            rank: None,
            score: None,
        }
    }

    fn raw(entries: Vec<(&str, Option<u32>, Option<f64>)>) -> RawVerdict {
        RawVerdict {
            winner: None,
            reasoning: Some("because".to_string()),
            rankings: Some(
                entries
                    .into_iter()
                    .map(|(p, rank, score)| RawRanking {
                        provider: p.to_string(),
                        rank,
                        score,
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_from_raw_happy_path() {
        let candidates = [ProviderId::OpenAi, ProviderId::Anthropic];
        let verdict = Verdict::from_raw(
            raw(vec![
                ("anthropic", Some(1), Some(8.5)),
                ("openai", Some(2), Some(7.2)),
            ]),
            &candidates,
        )
        .unwrap();

        assert_eq!(verdict.winner, ProviderId::Anthropic);
        assert!(verdict.has_dense_ranks());
        assert_eq!(verdict.rankings[0].score, 8.5);
    }

    #[test]
    fn test_missing_rankings_is_parse_failure() {
        let raw = RawVerdict {
            winner: Some("openai".to_string()),
            reasoning: None,
            rankings: None,
        };
        assert!(Verdict::from_raw(raw, &[ProviderId::OpenAi, ProviderId::Grok]).is_none());
    }

    #[test]
    fn test_missing_candidate_appended_last_with_neutral_score() {
        let candidates = [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Grok];
        let verdict = Verdict::from_raw(
            raw(vec![
                ("openai", Some(1), Some(9.0)),
                ("anthropic", Some(2), Some(7.0)),
            ]),
            &candidates,
        )
        .unwrap();

        let grok = verdict
            .rankings
            .iter()
            .find(|r| r.provider == ProviderId::Grok)
            .unwrap();
        assert_eq!(grok.rank, 3);
        assert_eq!(grok.score, 5.0);
    }

    #[test]
    fn test_duplicate_and_gapped_ranks_are_renumbered() {
        let candidates = [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Google];
        let verdict = Verdict::from_raw(
            raw(vec![
                ("google", Some(7), Some(6.0)),
                ("openai", Some(1), Some(9.0)),
                ("anthropic", Some(1), Some(8.0)),
            ]),
            &candidates,
        )
        .unwrap();

        assert!(verdict.has_dense_ranks());
        assert_eq!(verdict.winner, ProviderId::OpenAi);
        // gapped rank 7 squeezed down to 3
        let google = verdict
            .rankings
            .iter()
            .find(|r| r.provider == ProviderId::Google)
            .unwrap();
        assert_eq!(google.rank, 3);
    }

    #[test]
    fn test_unknown_and_foreign_providers_dropped() {
        let candidates = [ProviderId::OpenAi, ProviderId::Anthropic];
        let verdict = Verdict::from_raw(
            raw(vec![
                ("openai", Some(1), Some(9.0)),
                ("someone-else", Some(2), Some(8.0)),
                ("mistral", Some(3), Some(7.0)), // not a candidate this turn
                ("anthropic", Some(4), Some(6.0)),
            ]),
            &candidates,
        )
        .unwrap();

        assert_eq!(verdict.rankings.len(), 2);
        assert!(verdict.has_dense_ranks());
    }

    #[test]
    fn test_winner_field_overridden_by_rank_one() {
        let candidates = [ProviderId::OpenAi, ProviderId::Anthropic];
        let mut r = raw(vec![
            ("anthropic", Some(1), Some(8.0)),
            ("openai", Some(2), Some(7.0)),
        ]);
        r.winner = Some("openai".to_string());
        let verdict = Verdict::from_raw(r, &candidates).unwrap();
        assert_eq!(verdict.winner, ProviderId::Anthropic);
    }

    #[test]
    fn test_fallback_orders_by_latency_with_strictly_decreasing_scores() {
        let results = vec![
            result(ProviderId::OpenAi, Some(3.2)),
            result(ProviderId::Anthropic, Some(1.1)),
            result(ProviderId::Grok, Some(2.0)),
        ];
        let verdict = Verdict::fallback_by_latency(&results).unwrap();

        assert_eq!(verdict.winner, ProviderId::Anthropic);
        assert_eq!(verdict.reasoning, FALLBACK_REASONING);
        assert!(verdict.has_dense_ranks());

        let providers: Vec<_> = verdict.rankings.iter().map(|r| r.provider).collect();
        assert_eq!(
            providers,
            vec![ProviderId::Anthropic, ProviderId::Grok, ProviderId::OpenAi]
        );

        for pair in verdict.rankings.windows(2) {
            assert!(pair[0].score > pair[1].score);
        }
    }

    #[test]
    fn test_fallback_unmeasured_latency_sorts_last() {
        let results = vec![
            result(ProviderId::OpenAi, None),
            result(ProviderId::Anthropic, Some(4.0)),
        ];
        let verdict = Verdict::fallback_by_latency(&results).unwrap();
        assert_eq!(verdict.winner, ProviderId::Anthropic);
    }

    #[test]
    fn test_fallback_empty_is_none() {
        assert!(Verdict::fallback_by_latency(&[]).is_none());
    }
}
