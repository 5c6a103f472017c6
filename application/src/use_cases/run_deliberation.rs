//! Run Deliberation use case
//!
//! Drives the deliberation phase end to end: opens the streaming session,
//! folds fragments into the session transcript, and once the stream signals
//! completion performs the post-stream fetches: the structured board result
//! (fatal on failure) and the decision diagram (best-effort).

use std::sync::Arc;

use council_domain::{BoardResult, DecisionDiagram, Phase, Query, Session, SessionStatus, StreamEvent};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ports::board_api::{ApiError, BoardApi};
use crate::ports::observer::SessionObserver;
use crate::ports::streaming::{OpenRequest, SessionConnector};
use crate::use_cases::shared::fold_update;

/// The outcome of a successful deliberation.
#[derive(Debug, Clone)]
pub struct Decision {
    pub board: BoardResult,
    /// Absent when diagram rendering failed; never fatal.
    pub diagram: Option<DecisionDiagram>,
}

/// Errors that fail the deliberation flow.
#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("Failed to open deliberation stream: {0}")]
    Connect(String),

    #[error("Deliberation stream error: {0}")]
    Stream(String),

    #[error("Deliberation stream closed before completing")]
    ClosedEarly,

    #[error("Failed to fetch the board result: {0}")]
    ResultFetch(#[source] ApiError),
}

/// Use case for running a full deliberation phase.
pub struct RunDeliberationUseCase<C: SessionConnector, A: BoardApi> {
    connector: Arc<C>,
    api: Arc<A>,
}

impl<C: SessionConnector, A: BoardApi> RunDeliberationUseCase<C, A> {
    pub fn new(connector: Arc<C>, api: Arc<A>) -> Self {
        Self { connector, api }
    }

    /// Stream the deliberation into `session`, then fetch the result.
    ///
    /// `session` records the transcript and terminal status on every path,
    /// so the caller can display what happened even when this returns Err.
    pub async fn execute(
        &self,
        session: &mut Session,
        query: &Query,
        observer: &dyn SessionObserver,
    ) -> Result<Decision, DeliberationError> {
        info!("Opening deliberation session {}", session.id());

        let request = OpenRequest::Deliberation {
            query: query.content().to_string(),
        };
        let mut subscription = match self.connector.open(request).await {
            Ok(s) => s,
            Err(e) => {
                session.set_status(SessionStatus::Errored);
                session.transcript_mut().narrate(format!("Error: {e}"));
                observer.on_session_end(Phase::Deliberation, session.status());
                return Err(DeliberationError::Connect(e.to_string()));
            }
        };

        session.set_status(SessionStatus::Active);
        observer.on_session_open(Phase::Deliberation);

        loop {
            match subscription.recv().await {
                Some(StreamEvent::Update { speaker, delta }) => {
                    fold_update(session, &speaker, &delta, observer);
                }
                Some(StreamEvent::Completed) => {
                    debug!("Deliberation stream completed");
                    session.set_status(SessionStatus::Completed);
                    observer.on_session_end(Phase::Deliberation, session.status());
                    break;
                }
                Some(StreamEvent::Error(message)) => {
                    session.set_status(SessionStatus::Errored);
                    session.transcript_mut().narrate(format!("Error: {message}"));
                    observer.on_session_end(Phase::Deliberation, session.status());
                    return Err(DeliberationError::Stream(message));
                }
                // Closed without a terminal frame: for deliberation this is
                // a failure, the result fetch would race a half-run board.
                None => {
                    session.set_status(SessionStatus::Errored);
                    session
                        .transcript_mut()
                        .narrate("Error: connection closed before the board finished");
                    observer.on_session_end(Phase::Deliberation, session.status());
                    return Err(DeliberationError::ClosedEarly);
                }
            }
        }

        // Stream done; release the connection before the fetches.
        drop(subscription);

        let board = self
            .api
            .run_board(query)
            .await
            .map_err(DeliberationError::ResultFetch)?;

        let diagram = match self.api.render_diagram(&board).await {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("Diagram rendering unavailable: {e}");
                None
            }
        };

        Ok(Decision { board, diagram })
    }
}
