//! Streaming session port
//!
//! [`SessionConnector`] opens one bidirectional streaming session per phase.
//! The returned [`SessionSubscription`] is a cancellable subscription: an
//! ordered channel of decoded [`StreamEvent`]s plus an idempotent close
//! handle. The underlying connection is released exactly once on every exit
//! path: terminal frame, transport error, explicit close, or drop.

use async_trait::async_trait;
use council_domain::{Phase, StreamEvent};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The single client-to-server frame sent when a session opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OpenRequest {
    /// Seeds the deliberation phase: `{"query": ...}` on the wire.
    Deliberation { query: String },
    /// Seeds the execution phase: `{"plan": ...}` on the wire.
    Execution { plan: String },
}

impl OpenRequest {
    pub fn phase(&self) -> Phase {
        match self {
            OpenRequest::Deliberation { .. } => Phase::Deliberation,
            OpenRequest::Execution { .. } => Phase::Execution,
        }
    }
}

/// Errors raised while establishing a streaming session.
///
/// Failures after establishment are delivered in-band as
/// [`StreamEvent::Error`], not through this type.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("Failed to send the opening payload: {0}")]
    Handshake(String),
}

/// A live streaming session.
///
/// Events arrive in transport order; at most one terminal event
/// ([`StreamEvent::Completed`] or [`StreamEvent::Error`]) is ever delivered.
/// A clean close with no prior terminal frame simply ends the channel.
pub struct SessionSubscription {
    events: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
}

impl SessionSubscription {
    pub fn new(events: mpsc::Receiver<StreamEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Receive the next decoded event, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Close the session. Idempotent; releases the connection if still open.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        // Discarding the subscription releases the connection.
        self.cancel.cancel();
    }
}

/// Opens streaming sessions. Implemented by the WebSocket client in the
/// infrastructure layer and by in-memory fakes in tests.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn open(&self, request: OpenRequest) -> Result<SessionSubscription, StreamError>;
}
