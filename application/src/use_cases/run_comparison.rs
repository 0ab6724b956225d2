//! Run Comparison use case
//!
//! Orchestrates one comparison turn end to end: eligibility checks, the
//! provider fan-out (direct) or backend stream (mediated), the judge, and
//! the watchdog that bounds the whole turn.

use crate::ports::comparison_stream::{CompareRequest, ComparisonStream};
use crate::ports::credential_store::{CredentialStore, CredentialStoreError};
use crate::ports::observer::TurnObserver;
use crate::ports::provider_gateway::ProviderGateway;
use crate::use_cases::judge::{JudgePolicy, JudgeUseCase};
use arena_domain::{
    Applied, ComparisonTurn, ImageAttachment, ProviderId, StreamEvent, TurnMode, apply_event,
};
use crate::ports::usage::UsageObserver;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that reject a turn before anything is dispatched
#[derive(Error, Debug)]
pub enum RunComparisonError {
    #[error("need at least 2 eligible providers, got {0}")]
    InsufficientProviders(usize),

    #[error("mediated mode requires a signed-in session")]
    AuthRequired,

    #[error("no credits remaining")]
    NoCredits,

    #[error("image attachments are only supported in mediated mode")]
    ImageUnsupported,

    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

/// Backend session identity for mediated mode
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub token: String,
}

/// Input for one comparison turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub query: String,
    pub image: Option<ImageAttachment>,
    pub providers: Vec<ProviderId>,
    pub mode: TurnMode,
    pub enable_judge: bool,
    /// Preferred judge; selection falls back when it has no credential
    pub judge: Option<ProviderId>,
    pub auth: Option<AuthContext>,
    /// Known credit balance, if the session reported one
    pub credits: Option<i64>,
}

/// Watchdog budgets per mode
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub direct: Duration,
    pub mediated: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            direct: Duration::from_secs(30),
            mediated: Duration::from_secs(45),
        }
    }
}

/// Use case for running one comparison turn
pub struct RunComparisonUseCase<G, S>
where
    G: ProviderGateway + 'static,
    S: ComparisonStream + 'static,
{
    gateway: Arc<G>,
    stream: Arc<S>,
    credentials: Arc<dyn CredentialStore>,
    usage: Arc<dyn UsageObserver>,
    timeouts: Timeouts,
}

impl<G, S> RunComparisonUseCase<G, S>
where
    G: ProviderGateway + 'static,
    S: ComparisonStream + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        stream: Arc<S>,
        credentials: Arc<dyn CredentialStore>,
        usage: Arc<dyn UsageObserver>,
    ) -> Self {
        Self {
            gateway,
            stream,
            credentials,
            usage,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Run one turn to a terminal phase.
    ///
    /// `Err` means the turn was rejected before dispatch; once dispatched,
    /// failures and timeouts are reported through the returned turn's phase
    /// and status message instead.
    pub async fn execute(
        &self,
        request: TurnRequest,
        observer: &dyn TurnObserver,
    ) -> Result<ComparisonTurn, RunComparisonError> {
        match request.mode {
            TurnMode::Direct => self.run_direct(request, observer).await,
            TurnMode::Mediated => self.run_mediated(request, observer).await,
        }
    }

    // ==================== Direct mode ====================

    async fn run_direct(
        &self,
        request: TurnRequest,
        observer: &dyn TurnObserver,
    ) -> Result<ComparisonTurn, RunComparisonError> {
        if request.image.is_some() {
            return Err(RunComparisonError::ImageUnsupported);
        }

        // One snapshot per turn; a key edit mid-flight never splits a fan-out
        let credentials = self.credentials.load()?;
        let eligible: Vec<ProviderId> = request
            .providers
            .iter()
            .copied()
            .filter(|p| credentials.contains_key(p) && p.direct_endpoint().is_some())
            .collect();
        if eligible.len() < 2 {
            return Err(RunComparisonError::InsufficientProviders(eligible.len()));
        }

        info!("Dispatching direct comparison to {} providers", eligible.len());
        let mut turn = ComparisonTurn::new(request.query.clone(), None, eligible.clone());
        turn.dispatch();

        let mut join_set = JoinSet::new();
        for provider in &eligible {
            let gateway = Arc::clone(&self.gateway);
            let provider = *provider;
            let query = request.query.clone();
            let credential = credentials[&provider].clone();

            join_set.spawn(async move {
                let result = gateway.invoke(provider, &query, &credential).await;
                (provider, result)
            });
        }

        let watchdog = tokio::time::sleep(self.timeouts.direct);
        tokio::pin!(watchdog);

        loop {
            tokio::select! {
                joined = join_set.join_next() => {
                    match joined {
                        Some(Ok((provider, Ok(result)))) => {
                            info!("Provider {} responded", provider);
                            observer.on_result(&result);
                            turn.merge_result(result);
                        }
                        Some(Ok((provider, Err(e)))) => {
                            warn!("Provider {} failed: {}", provider, e);
                            observer.on_provider_failed(provider, &e.message);
                        }
                        Some(Err(e)) => {
                            warn!("Task join error: {}", e);
                        }
                        None => break,
                    }
                }
                _ = &mut watchdog => {
                    warn!("Direct comparison timed out");
                    join_set.abort_all();
                    turn.time_out("Request timed out.");
                    return Ok(turn);
                }
            }
        }

        match turn.results.len() {
            0 => {
                turn.fail("All providers failed.");
                return Ok(turn);
            }
            1 => {
                turn.resolve(Some("Not enough successful responses to judge."));
                return Ok(turn);
            }
            _ => {}
        }

        if !request.enable_judge {
            turn.resolve(None);
            return Ok(turn);
        }

        turn.begin_judging();
        observer.on_status("Judging responses...");

        let judge = JudgeUseCase::new(
            Arc::clone(&self.gateway),
            JudgePolicy {
                preferred: request.judge,
            },
        );
        let results: Vec<_> = turn.ranked_results().into_iter().cloned().collect();
        let judging = judge.execute(&request.query, &results, &credentials, observer);
        tokio::pin!(judging);

        tokio::select! {
            outcome = &mut judging => match outcome {
                Ok(verdict) => {
                    observer.on_verdict(&verdict);
                    turn.apply_verdict(verdict);
                }
                Err(e) => {
                    warn!("Judging failed: {}", e);
                    turn.resolve(Some("Judging unavailable."));
                }
            },
            _ = &mut watchdog => {
                warn!("Judging timed out");
                turn.time_out("Request timed out.");
            }
        }

        Ok(turn)
    }

    // ==================== Mediated mode ====================

    async fn run_mediated(
        &self,
        request: TurnRequest,
        observer: &dyn TurnObserver,
    ) -> Result<ComparisonTurn, RunComparisonError> {
        let auth = request.auth.ok_or(RunComparisonError::AuthRequired)?;
        if request.credits.is_some_and(|c| c <= 0) {
            return Err(RunComparisonError::NoCredits);
        }
        if request.providers.len() < 2 {
            return Err(RunComparisonError::InsufficientProviders(
                request.providers.len(),
            ));
        }

        info!(
            "Opening mediated comparison for {} providers",
            request.providers.len()
        );
        let mut turn = ComparisonTurn::new(
            request.query.clone(),
            request.image.clone(),
            request.providers.clone(),
        );
        turn.dispatch();

        let (tx, mut rx) = mpsc::channel::<StreamEvent>(64);
        let stream = Arc::clone(&self.stream);
        let compare = CompareRequest {
            user_id: auth.user_id,
            message: request.query,
            providers: request.providers,
            enable_judge: request.enable_judge,
            judge_provider: request.judge,
            image: request.image,
            auth_token: auth.token,
        };
        let mut transport = tokio::spawn(async move { stream.open(compare, tx).await });

        let watchdog = tokio::time::sleep(self.timeouts.mediated);
        tokio::pin!(watchdog);

        while !turn.phase.is_terminal() {
            tokio::select! {
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    self.apply_mediated_event(&mut turn, event, observer);
                }
                _ = &mut watchdog => {
                    warn!("Mediated comparison timed out");
                    transport.abort();
                    turn.time_out("Request timed out.");
                    return Ok(turn);
                }
            }
        }

        if !turn.phase.is_terminal() {
            // channel closed without a terminal event: the transport verdict
            // decides how the turn ends
            match (&mut transport).await {
                Ok(Ok(())) => turn.resolve(None),
                Ok(Err(e)) => {
                    warn!("Stream transport failed: {}", e);
                    turn.fail(&e.to_string());
                }
                Err(e) => {
                    warn!("Stream task panicked: {}", e);
                    turn.fail("Comparison stream failed.");
                }
            }
        } else {
            transport.abort();
        }

        Ok(turn)
    }

    fn apply_mediated_event(
        &self,
        turn: &mut ComparisonTurn,
        event: StreamEvent,
        observer: &dyn TurnObserver,
    ) {
        // peek fields needed for callbacks before the event is consumed
        match &event {
            StreamEvent::Token { provider, content } => observer.on_token(*provider, content),
            StreamEvent::JudgeToken(token) => observer.on_judge_token(token),
            StreamEvent::Error(message) => observer.on_status(message),
            _ => {}
        }

        match apply_event(turn, event) {
            Applied::ResultMerged(provider) => {
                if let Some(result) = turn.results.get(&provider) {
                    observer.on_result(result);
                }
            }
            Applied::VerdictApplied => {
                if let Some(verdict) = &turn.verdict {
                    observer.on_verdict(verdict);
                }
                // the one place a mediated turn consumes a credit
                self.usage.on_comparison_charged();
            }
            Applied::StatusNoted(status) => observer.on_status(&status),
            Applied::Ignored => debug!("Ignored stream event"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::comparison_stream::StreamError;
    use crate::ports::credential_store::CredentialMap;
    use crate::ports::observer::NoObserver;
    use crate::ports::provider_gateway::ProviderError;
    use arena_domain::{ProviderResult, RawRanking, RawVerdict, TurnPhase};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MemoryStore(Mutex<CredentialMap>);

    impl MemoryStore {
        fn with(providers: &[ProviderId]) -> Arc<Self> {
            let map = providers.iter().map(|p| (*p, "sk-test".to_string())).collect();
            Arc::new(Self(Mutex::new(map)))
        }
    }

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Result<CredentialMap, CredentialStoreError> {
            Ok(self.0.lock().unwrap().clone())
        }
        fn save(&self, credentials: &CredentialMap) -> Result<(), CredentialStoreError> {
            *self.0.lock().unwrap() = credentials.clone();
            Ok(())
        }
    }

    struct CountingUsage(AtomicUsize);

    impl UsageObserver for CountingUsage {
        fn on_comparison_charged(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Gateway that answers from a canned table after an optional delay
    struct TableGateway {
        answers: HashMap<ProviderId, Result<(String, f64), String>>,
        delay: Duration,
    }

    impl TableGateway {
        fn new(answers: Vec<(ProviderId, Result<(&str, f64), &str>)>) -> Arc<Self> {
            Arc::new(Self {
                answers: answers
                    .into_iter()
                    .map(|(p, r)| {
                        (p, r.map(|(s, t)| (s.to_string(), t)).map_err(String::from))
                    })
                    .collect(),
                delay: Duration::ZERO,
            })
        }

        fn slow(mut answers: Arc<Self>, delay: Duration) -> Arc<Self> {
            Arc::get_mut(&mut answers).unwrap().delay = delay;
            answers
        }
    }

    #[async_trait]
    impl ProviderGateway for TableGateway {
        async fn invoke(
            &self,
            provider: ProviderId,
            _prompt: &str,
            _credential: &str,
        ) -> Result<ProviderResult, ProviderError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.answers.get(&provider) {
                Some(Ok((text, elapsed))) => Ok(ProviderResult::complete(
                    provider,
                    "test-model",
                    text.clone(),
                    *elapsed,
                )),
                Some(Err(message)) => Err(ProviderError::new(provider, message.clone())),
                None => Err(ProviderError::new(provider, "no canned answer")),
            }
        }
    }

    /// Stream that replays a scripted event sequence
    struct ScriptedStream {
        events: Vec<StreamEvent>,
        outcome: Result<(), String>,
    }

    impl ScriptedStream {
        fn new(events: Vec<StreamEvent>) -> Arc<Self> {
            Arc::new(Self {
                events,
                outcome: Ok(()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                events: Vec::new(),
                outcome: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl ComparisonStream for ScriptedStream {
        async fn open(
            &self,
            _request: CompareRequest,
            events: mpsc::Sender<StreamEvent>,
        ) -> Result<(), StreamError> {
            for event in &self.events {
                if events.send(event.clone()).await.is_err() {
                    break;
                }
            }
            self.outcome
                .clone()
                .map_err(StreamError::Transport)
        }
    }

    fn use_case(
        gateway: Arc<TableGateway>,
        stream: Arc<ScriptedStream>,
        store: Arc<MemoryStore>,
        usage: Arc<CountingUsage>,
    ) -> RunComparisonUseCase<TableGateway, ScriptedStream> {
        RunComparisonUseCase::new(gateway, stream, store, usage)
    }

    fn direct_request(providers: Vec<ProviderId>) -> TurnRequest {
        TurnRequest {
            query: "what is 2+2?".to_string(),
            image: None,
            providers,
            mode: TurnMode::Direct,
            enable_judge: true,
            judge: None,
            auth: None,
            credits: None,
        }
    }

    fn mediated_request(providers: Vec<ProviderId>) -> TurnRequest {
        TurnRequest {
            mode: TurnMode::Mediated,
            auth: Some(AuthContext {
                user_id: "u-1".to_string(),
                token: "jwt".to_string(),
            }),
            credits: Some(10),
            ..direct_request(providers)
        }
    }

    fn usage_counter() -> Arc<CountingUsage> {
        Arc::new(CountingUsage(AtomicUsize::new(0)))
    }

    #[tokio::test]
    async fn test_direct_both_respond_and_get_ranked() {
        // judge output is not JSON, so ranking falls back to latency
        let gateway = TableGateway::new(vec![
            (ProviderId::OpenAi, Ok(("It is 4.", 2.0))),
            (ProviderId::Anthropic, Ok(("4.", 0.5))),
        ]);
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi, ProviderId::Anthropic]),
            usage_counter(),
        );

        let turn = uc
            .execute(
                direct_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Resolved);
        assert_eq!(turn.results.len(), 2);
        let verdict = turn.verdict.as_ref().unwrap();
        assert!(verdict.has_dense_ranks());
        assert_eq!(verdict.winner, ProviderId::Anthropic);
        let ranks: Vec<_> = turn.ranked_results().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_direct_single_credential_rejected_before_dispatch() {
        let gateway = TableGateway::new(vec![(ProviderId::OpenAi, Ok(("4", 1.0)))]);
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi]),
            usage_counter(),
        );

        let err = uc
            .execute(
                direct_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RunComparisonError::InsufficientProviders(1)));
    }

    #[tokio::test]
    async fn test_direct_provider_failure_absorbed() {
        let gateway = TableGateway::new(vec![
            (ProviderId::OpenAi, Ok(("a", 1.0))),
            (ProviderId::Anthropic, Ok(("b", 2.0))),
            (ProviderId::Grok, Err("401 Unauthorized")),
        ]);
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Grok]),
            usage_counter(),
        );

        let turn = uc
            .execute(
                direct_request(vec![
                    ProviderId::OpenAi,
                    ProviderId::Anthropic,
                    ProviderId::Grok,
                ]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Resolved);
        assert_eq!(turn.results.len(), 2);
        assert!(!turn.results.contains_key(&ProviderId::Grok));
    }

    #[tokio::test]
    async fn test_direct_single_success_resolves_without_verdict() {
        let gateway = TableGateway::new(vec![
            (ProviderId::OpenAi, Ok(("a", 1.0))),
            (ProviderId::Anthropic, Err("overloaded")),
        ]);
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi, ProviderId::Anthropic]),
            usage_counter(),
        );

        let turn = uc
            .execute(
                direct_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Resolved);
        assert!(turn.verdict.is_none());
        assert_eq!(
            turn.status_message.as_deref(),
            Some("Not enough successful responses to judge.")
        );
    }

    #[tokio::test]
    async fn test_direct_timeout_marks_turn_timed_out() {
        let gateway = TableGateway::slow(
            TableGateway::new(vec![
                (ProviderId::OpenAi, Ok(("a", 1.0))),
                (ProviderId::Anthropic, Ok(("b", 1.0))),
            ]),
            Duration::from_millis(200),
        );
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi, ProviderId::Anthropic]),
            usage_counter(),
        )
        .with_timeouts(Timeouts {
            direct: Duration::from_millis(20),
            mediated: Duration::from_millis(20),
        });

        let turn = uc
            .execute(
                direct_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::TimedOut);
        assert_eq!(turn.status_message.as_deref(), Some("Request timed out."));
    }

    #[tokio::test]
    async fn test_direct_image_rejected() {
        let gateway = TableGateway::new(vec![]);
        let uc = use_case(
            gateway,
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[ProviderId::OpenAi, ProviderId::Anthropic]),
            usage_counter(),
        );

        let mut request = direct_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]);
        request.image = Some(ImageAttachment {
            base64: "aGk=".to_string(),
            mime_type: "image/png".to_string(),
        });
        let err = uc.execute(request, &NoObserver).await.unwrap_err();
        assert!(matches!(err, RunComparisonError::ImageUnsupported));
    }

    fn scripted_verdict() -> StreamEvent {
        StreamEvent::Evaluation(RawVerdict {
            winner: Some("openai".to_string()),
            reasoning: Some("clearer".to_string()),
            rankings: Some(vec![
                RawRanking {
                    provider: "openai".to_string(),
                    rank: Some(1),
                    score: Some(8.5),
                },
                RawRanking {
                    provider: "anthropic".to_string(),
                    rank: Some(2),
                    score: Some(7.0),
                },
            ]),
        })
    }

    #[tokio::test]
    async fn test_mediated_stream_resolves_and_charges_once() {
        let stream = ScriptedStream::new(vec![
            StreamEvent::Token {
                provider: ProviderId::OpenAi,
                content: "The ".to_string(),
            },
            StreamEvent::Token {
                provider: ProviderId::OpenAi,
                content: "answer ".to_string(),
            },
            StreamEvent::Token {
                provider: ProviderId::OpenAi,
                content: "is 4.".to_string(),
            },
            StreamEvent::Response {
                provider: ProviderId::Anthropic,
                model: "claude".to_string(),
                response: "4.".to_string(),
            },
            scripted_verdict(),
            StreamEvent::Complete,
        ]);
        let usage = usage_counter();
        let uc = use_case(
            TableGateway::new(vec![]),
            stream,
            MemoryStore::with(&[]),
            Arc::clone(&usage),
        );

        let turn = uc
            .execute(
                mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Resolved);
        assert_eq!(
            turn.results[&ProviderId::OpenAi].response_text,
            "The answer is 4."
        );
        assert_eq!(turn.results[&ProviderId::Anthropic].response_text, "4.");
        assert_eq!(turn.verdict.as_ref().unwrap().winner, ProviderId::OpenAi);
        assert_eq!(usage.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mediated_requires_auth() {
        let uc = use_case(
            TableGateway::new(vec![]),
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[]),
            usage_counter(),
        );

        let mut request = mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]);
        request.auth = None;
        let err = uc.execute(request, &NoObserver).await.unwrap_err();
        assert!(matches!(err, RunComparisonError::AuthRequired));
    }

    #[tokio::test]
    async fn test_mediated_zero_credits_rejected() {
        let uc = use_case(
            TableGateway::new(vec![]),
            ScriptedStream::new(vec![]),
            MemoryStore::with(&[]),
            usage_counter(),
        );

        let mut request = mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]);
        request.credits = Some(0);
        let err = uc.execute(request, &NoObserver).await.unwrap_err();
        assert!(matches!(err, RunComparisonError::NoCredits));
    }

    #[tokio::test]
    async fn test_mediated_transport_failure_fails_turn() {
        let usage = usage_counter();
        let uc = use_case(
            TableGateway::new(vec![]),
            ScriptedStream::failing("connection reset"),
            MemoryStore::with(&[]),
            Arc::clone(&usage),
        );

        let turn = uc
            .execute(
                mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Failed);
        assert_eq!(usage.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mediated_error_event_fails_turn_without_charge() {
        let usage = usage_counter();
        let uc = use_case(
            TableGateway::new(vec![]),
            ScriptedStream::new(vec![StreamEvent::Error("provider pool down".to_string())]),
            MemoryStore::with(&[]),
            Arc::clone(&usage),
        );

        let turn = uc
            .execute(
                mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Failed);
        assert_eq!(turn.status_message.as_deref(), Some("provider pool down"));
        assert_eq!(usage.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mediated_eof_without_terminal_event_resolves() {
        // scripted stream ends cleanly without sending `complete`
        let stream = ScriptedStream::new(vec![StreamEvent::Response {
            provider: ProviderId::OpenAi,
            model: "gpt-4o".to_string(),
            response: "4".to_string(),
        }]);
        let uc = use_case(
            TableGateway::new(vec![]),
            stream,
            MemoryStore::with(&[]),
            usage_counter(),
        );

        let turn = uc
            .execute(
                mediated_request(vec![ProviderId::OpenAi, ProviderId::Anthropic]),
                &NoObserver,
            )
            .await
            .unwrap();

        assert_eq!(turn.phase, TurnPhase::Resolved);
        assert_eq!(turn.results.len(), 1);
    }
}
