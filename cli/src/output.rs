//! Console rendering for comparison turns

use arena_application::TurnObserver;
use arena_domain::{ComparisonTurn, ProviderId, ProviderResult, TurnPhase, Verdict, catalog};
use std::io::Write;
use std::sync::Mutex;

/// Observer that narrates turn progress on stdout
pub struct ConsoleObserver {
    /// Provider currently streaming tokens, for block headers
    streaming: Mutex<Option<ProviderId>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            streaming: Mutex::new(None),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnObserver for ConsoleObserver {
    fn on_token(&self, provider: ProviderId, content: &str) {
        let mut streaming = self.streaming.lock().unwrap();
        if *streaming != Some(provider) {
            println!("\n--- {} ---", display_name(provider));
            *streaming = Some(provider);
        }
        print!("{content}");
        let _ = std::io::stdout().flush();
    }

    fn on_result(&self, result: &ProviderResult) {
        let elapsed = result
            .elapsed_seconds
            .map(|s| format!(" ({s:.1}s)"))
            .unwrap_or_default();
        println!("\n[done] {}{elapsed}", display_name(result.provider));
    }

    fn on_provider_failed(&self, provider: ProviderId, message: &str) {
        println!("\n[failed] {}: {message}", display_name(provider));
    }

    fn on_status(&self, message: &str) {
        println!("\n* {message}");
    }

    fn on_judge_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    fn on_verdict(&self, _verdict: &Verdict) {
        println!();
    }
}

/// Render a finished turn
pub fn print_turn(turn: &ComparisonTurn) {
    println!();
    match turn.phase {
        TurnPhase::Failed | TurnPhase::TimedOut => {
            println!(
                "Comparison {}: {}",
                turn.phase,
                turn.status_message.as_deref().unwrap_or("unknown error")
            );
            return;
        }
        _ => {}
    }

    for result in turn.ranked_results() {
        let rank = result
            .rank
            .map(|r| format!("#{r} "))
            .unwrap_or_default();
        let score = result
            .score
            .map(|s| format!("  score {s:.1}"))
            .unwrap_or_default();
        let elapsed = result
            .elapsed_seconds
            .map(|s| format!("  {s:.1}s"))
            .unwrap_or_default();

        println!("=== {rank}{} ({}){score}{elapsed} ===", display_name(result.provider), result.model);
        println!("{}", result.response_text.trim_end());
        println!();
    }

    if let Some(verdict) = &turn.verdict {
        println!("Winner: {}", display_name(verdict.winner));
        println!();
        println!("{}", verdict.reasoning.trim());
    } else if let Some(message) = &turn.status_message {
        println!("{message}");
    }
}

fn display_name(provider: ProviderId) -> &'static str {
    catalog()
        .iter()
        .find(|info| info.id == provider)
        .map(|info| info.name)
        .unwrap_or_else(|| provider.as_str())
}
