//! Judge use case
//!
//! Selects a judge provider from the available credentials, invokes it over
//! the collected responses, and turns its output into a normalized
//! [`Verdict`]. Unparseable judge output degrades to latency ordering
//! rather than failing the turn.

use crate::ports::credential_store::CredentialMap;
use crate::ports::observer::TurnObserver;
use crate::ports::provider_gateway::{ProviderError, ProviderGateway};
use arena_domain::{
    ProviderId, ProviderResult, Verdict, judge_prompt, parse_judge_response,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors that can occur while judging
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("need at least 2 responses to judge, got {0}")]
    InsufficientResponses(usize),

    #[error("no credentialed provider available for judging")]
    NoCredential,

    #[error(transparent)]
    Invocation(#[from] ProviderError),
}

/// Judge selection policy
#[derive(Debug, Clone, Default)]
pub struct JudgePolicy {
    /// Preferred judge, used when a credential for it exists
    pub preferred: Option<ProviderId>,
}

/// Use case for ranking collected responses with an AI judge
pub struct JudgeUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
    policy: JudgePolicy,
}

impl<G: ProviderGateway + 'static> JudgeUseCase<G> {
    pub fn new(gateway: Arc<G>, policy: JudgePolicy) -> Self {
        Self { gateway, policy }
    }

    /// Pick the judge: preferred if credentialed, else Mistral, else OpenAI,
    /// else any credentialed provider with a direct endpoint.
    pub fn select_judge(&self, credentials: &CredentialMap) -> Option<ProviderId> {
        let usable = |p: &ProviderId| credentials.contains_key(p) && p.direct_endpoint().is_some();

        if let Some(preferred) = self.policy.preferred {
            if usable(&preferred) {
                return Some(preferred);
            }
        }
        [ProviderId::Mistral, ProviderId::OpenAi]
            .into_iter()
            .find(|p| usable(p))
            .or_else(|| ProviderId::all().iter().copied().find(usable))
    }

    /// Judge the collected responses and return a verdict.
    ///
    /// Judge narrative tokens are forwarded to the observer while the judge
    /// streams. Output that cannot be parsed as a verdict falls back to
    /// latency ordering; only invocation failures surface as errors.
    pub async fn execute(
        &self,
        user_query: &str,
        results: &[ProviderResult],
        credentials: &CredentialMap,
        observer: &dyn TurnObserver,
    ) -> Result<Verdict, JudgeError> {
        if results.len() < 2 {
            return Err(JudgeError::InsufficientResponses(results.len()));
        }
        let judge = self
            .select_judge(credentials)
            .ok_or(JudgeError::NoCredential)?;
        let credential = credentials.get(&judge).ok_or(JudgeError::NoCredential)?;

        info!("Judging {} responses with {}", results.len(), judge);
        let prompt = judge_prompt(user_query, results);

        let streams = judge
            .direct_endpoint()
            .is_some_and(|e| e.dialect.supports_streaming());
        let response = if streams {
            self.invoke_streaming_judge(judge, &prompt, credential, observer)
                .await?
        } else {
            self.gateway
                .invoke(judge, &prompt, credential)
                .await?
                .response_text
        };

        let candidates: Vec<ProviderId> = results.iter().map(|r| r.provider).collect();
        match parse_judge_response(&response, &candidates) {
            Some(verdict) => Ok(verdict),
            None => {
                warn!("Judge output unparseable, falling back to latency ranking");
                Verdict::fallback_by_latency(results)
                    .ok_or(JudgeError::InsufficientResponses(0))
            }
        }
    }

    async fn invoke_streaming_judge(
        &self,
        judge: ProviderId,
        prompt: &str,
        credential: &str,
        observer: &dyn TurnObserver,
    ) -> Result<String, JudgeError> {
        let (tx, mut rx) = mpsc::channel::<String>(32);
        let invocation = self.gateway.invoke_streaming(judge, prompt, credential, tx);
        tokio::pin!(invocation);

        let result = loop {
            tokio::select! {
                outcome = &mut invocation => break outcome,
                Some(token) = rx.recv() => observer.on_judge_token(&token),
            }
        };
        // drain tokens that raced with completion
        while let Ok(token) = rx.try_recv() {
            observer.on_judge_token(&token);
        }

        debug!("Judge {} finished streaming", judge);
        Ok(result?.response_text)
    }
}
