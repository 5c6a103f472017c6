//! Run Execution use case
//!
//! Drives the optional execution phase: opens the streaming session seeded
//! with the board's final verdict and folds fragments until a terminal
//! signal. Execution failures never abort the application flow; the
//! terminal status is recorded on the session and shown inline, so the
//! already-displayed decision survives.

use std::sync::Arc;

use council_domain::{Phase, Session, SessionStatus, StreamEvent};
use tracing::{debug, info};

use crate::ports::observer::SessionObserver;
use crate::ports::streaming::{OpenRequest, SessionConnector};
use crate::use_cases::shared::fold_update;

/// Use case for running the execution phase.
pub struct RunExecutionUseCase<C: SessionConnector> {
    connector: Arc<C>,
}

impl<C: SessionConnector> RunExecutionUseCase<C> {
    pub fn new(connector: Arc<C>) -> Self {
        Self { connector }
    }

    /// Stream the execution phase into `session` and return its terminal
    /// status.
    ///
    /// The remote collaborator may close the channel as its sole completion
    /// signal: a clean close with no prior `complete`/`error` frame counts
    /// as `Completed`, not `Errored`.
    pub async fn execute(
        &self,
        session: &mut Session,
        plan: &str,
        observer: &dyn SessionObserver,
    ) -> SessionStatus {
        info!("Opening execution session {}", session.id());

        let request = OpenRequest::Execution {
            plan: plan.to_string(),
        };
        let mut subscription = match self.connector.open(request).await {
            Ok(s) => s,
            Err(e) => {
                session.set_status(SessionStatus::Errored);
                session.transcript_mut().narrate(format!("Error: {e}"));
                observer.on_session_end(Phase::Execution, session.status());
                return SessionStatus::Errored;
            }
        };

        session.set_status(SessionStatus::Active);
        observer.on_session_open(Phase::Execution);

        let status = loop {
            match subscription.recv().await {
                Some(StreamEvent::Update { speaker, delta }) => {
                    fold_update(session, &speaker, &delta, observer);
                }
                Some(StreamEvent::Completed) => {
                    debug!("Execution stream completed");
                    break SessionStatus::Completed;
                }
                Some(StreamEvent::Error(message)) => {
                    session.transcript_mut().narrate(format!("Error: {message}"));
                    break SessionStatus::Errored;
                }
                // Close without a terminal frame is the server's way of
                // saying it is done.
                None => break SessionStatus::Completed,
            }
        };

        session.set_status(status.clone());
        observer.on_session_end(Phase::Execution, session.status());
        status
    }
}
