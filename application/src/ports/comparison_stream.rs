//! Comparison stream port
//!
//! Defines the interface for the backend-mediated comparison mode: one
//! request out, a stream of typed events back. The adapter owns transport
//! and framing; the use case only ever sees [`StreamEvent`]s.

use arena_domain::{ImageAttachment, ProviderId, StreamEvent};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Request for one mediated comparison
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub user_id: String,
    pub message: String,
    pub providers: Vec<ProviderId>,
    pub enable_judge: bool,
    pub judge_provider: Option<ProviderId>,
    pub image: Option<ImageAttachment>,
    pub auth_token: String,
}

/// Transport-level stream failure
///
/// Distinct from an in-stream `error` event: these mean the stream never
/// delivered (or stopped delivering) frames at all.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for opening a mediated comparison stream
#[async_trait]
pub trait ComparisonStream: Send + Sync {
    /// Open the stream and forward every decoded event to `events` until the
    /// stream ends or the receiver is dropped.
    ///
    /// Returns `Ok(())` when the stream ended cleanly (terminal event seen,
    /// or EOF — in which case the adapter sends a synthetic
    /// [`StreamEvent::Complete`] first). Transport failures surface as
    /// `Err` without any terminal event having been sent.
    async fn open(
        &self,
        request: CompareRequest,
        events: mpsc::Sender<StreamEvent>,
    ) -> Result<(), StreamError>;
}
