//! Application orchestrator
//!
//! The top-level state machine. It owns the current phase, the active
//! session, the board result, and error state, and mediates between user
//! intent (submit a query, request execution, export the report, reset)
//! and the streaming/fetching use cases.
//!
//! All transitions happen on the caller's task: commands take `&mut self`,
//! so they are serialized by construction and phase transitions read as
//! sequential awaits. Each opened session gets a fresh id; discarding a
//! session drops its subscription, which closes the connection and makes it
//! impossible for late in-flight frames to reach a newer session.

pub mod state;

use std::sync::Arc;

use council_domain::{DomainError, Phase, Query, Session};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::ports::board_api::{ApiError, BoardApi};
use crate::ports::observer::{NoopObserver, SessionObserver};
use crate::ports::streaming::SessionConnector;
use crate::use_cases::export_report::{ExportReportUseCase, ReportFile};
use crate::use_cases::run_deliberation::{DeliberationError, RunDeliberationUseCase};
use crate::use_cases::run_execution::RunExecutionUseCase;
use state::{AppPhase, AppSnapshot};

/// Errors surfaced to the user by orchestrator commands.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error(transparent)]
    InvalidQuery(#[from] DomainError),

    #[error("A query can only be submitted when idle (currently {0})")]
    NotIdle(AppPhase),

    #[error("Execution requires a completed deliberation (currently {0})")]
    NoDecision(AppPhase),

    #[error("No deliberation result available")]
    NoBoardResult,

    #[error(transparent)]
    Deliberation(#[from] DeliberationError),

    #[error("Report export failed: {0}")]
    Export(#[from] ApiError),
}

/// The application orchestrator.
pub struct Orchestrator<C: SessionConnector, A: BoardApi> {
    deliberation: RunDeliberationUseCase<C, A>,
    execution: RunExecutionUseCase<C>,
    report: ExportReportUseCase<A>,
    snapshot_tx: watch::Sender<AppSnapshot>,
    next_session_id: u64,
}

impl<C: SessionConnector, A: BoardApi> Orchestrator<C, A> {
    pub fn new(connector: Arc<C>, api: Arc<A>) -> Self {
        let (snapshot_tx, _) = watch::channel(AppSnapshot::default());
        Self {
            deliberation: RunDeliberationUseCase::new(connector.clone(), api.clone()),
            execution: RunExecutionUseCase::new(connector),
            report: ExportReportUseCase::new(api),
            snapshot_tx,
            next_session_id: 0,
        }
    }

    /// The current state snapshot.
    pub fn snapshot(&self) -> AppSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Watch the state as it transitions.
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn phase(&self) -> AppPhase {
        self.snapshot_tx.borrow().phase
    }

    /// Submit a query and run the deliberation phase to its conclusion.
    ///
    /// `Idle` → `Deliberating` → `DecisionReady` on success, `Failed` on a
    /// stream error or a failed result fetch. Diagram rendering is
    /// best-effort and never fails the flow.
    pub async fn submit_query(&mut self, raw_query: &str) -> Result<(), OrchestratorError> {
        self.submit_query_with_observer(raw_query, &NoopObserver).await
    }

    pub async fn submit_query_with_observer(
        &mut self,
        raw_query: &str,
        observer: &dyn SessionObserver,
    ) -> Result<(), OrchestratorError> {
        let phase = self.phase();
        if phase != AppPhase::Idle {
            return Err(OrchestratorError::NotIdle(phase));
        }
        let query = Query::try_new(raw_query)?;

        info!("Submitting query to the board");
        let mut session = self.open_session(Phase::Deliberation);
        let query_for_state = query.clone();
        self.publish(move |s| {
            s.phase = AppPhase::Deliberating;
            s.query = Some(query_for_state);
            s.session = None;
            s.board = None;
            s.diagram = None;
            s.last_error = None;
        });

        match self.deliberation.execute(&mut session, &query, observer).await {
            Ok(decision) => {
                self.publish(move |s| {
                    s.phase = AppPhase::DecisionReady;
                    s.session = Some(session);
                    s.board = Some(decision.board);
                    s.diagram = decision.diagram;
                });
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.publish(move |s| {
                    s.phase = AppPhase::Failed;
                    s.session = Some(session);
                    s.last_error = Some(message);
                });
                Err(e.into())
            }
        }
    }

    /// Open the execution phase, seeded with the board's final verdict.
    ///
    /// Re-entrant calls while `Executing` are a no-op; at most one
    /// execution session ever opens. The phase stays `Executing` after the
    /// session ends; the terminal status lives on the session.
    pub async fn request_execution(&mut self) -> Result<(), OrchestratorError> {
        self.request_execution_with_observer(&NoopObserver).await
    }

    pub async fn request_execution_with_observer(
        &mut self,
        observer: &dyn SessionObserver,
    ) -> Result<(), OrchestratorError> {
        match self.phase() {
            AppPhase::DecisionReady => {}
            AppPhase::Executing => {
                debug!("Execution already requested; ignoring");
                return Ok(());
            }
            other => return Err(OrchestratorError::NoDecision(other)),
        }

        let plan = self
            .snapshot_tx
            .borrow()
            .board
            .as_ref()
            .ok_or(OrchestratorError::NoBoardResult)?
            .final_verdict
            .clone();

        info!("Handing the verdict to the execution squad");
        let mut session = self.open_session(Phase::Execution);
        self.publish(|s| {
            s.phase = AppPhase::Executing;
            s.session = None;
        });

        self.execution.execute(&mut session, &plan, observer).await;

        self.publish(move |s| {
            s.session = Some(session);
        });
        Ok(())
    }

    /// Export the board report document. Leaves the state untouched.
    pub async fn export_report(&self) -> Result<ReportFile, OrchestratorError> {
        let board = self
            .snapshot_tx
            .borrow()
            .board
            .clone()
            .ok_or(OrchestratorError::NoBoardResult)?;
        Ok(self.report.execute(&board).await?)
    }

    /// Discard everything and return to `Idle`.
    pub fn reset(&mut self) {
        debug!("Resetting application state");
        self.snapshot_tx.send_replace(AppSnapshot::default());
    }

    fn open_session(&mut self, phase: Phase) -> Session {
        self.next_session_id += 1;
        Session::new(self.next_session_id, phase)
    }

    fn publish<F: FnOnce(&mut AppSnapshot)>(&self, update: F) {
        let mut next = self.snapshot_tx.borrow().clone();
        update(&mut next);
        self.snapshot_tx.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::streaming::{OpenRequest, SessionSubscription, StreamError};
    use async_trait::async_trait;
    use council_domain::{BoardResult, DecisionDiagram, SessionStatus, StrategicOption, StreamEvent};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    /// Scripted behavior for one `open` call on the fake connector.
    enum Script {
        /// Queue these events, then end the stream (sender dropped).
        Events(Vec<StreamEvent>),
        /// Queue these events but keep the sender alive, so the channel
        /// stays open and late frames can still be pushed.
        EventsHeldOpen(Vec<StreamEvent>),
        /// Refuse the connection.
        Refuse,
    }

    #[derive(Default)]
    struct FakeConnector {
        scripts: Mutex<VecDeque<Script>>,
        opened: Mutex<Vec<OpenRequest>>,
        tokens: Mutex<Vec<CancellationToken>>,
        held_senders: Mutex<Vec<mpsc::Sender<StreamEvent>>>,
    }

    impl FakeConnector {
        fn scripted(scripts: Vec<Script>) -> Arc<Self> {
            Arc::new(Self {
                scripts: Mutex::new(scripts.into()),
                ..Default::default()
            })
        }

        fn open_count(&self) -> usize {
            self.opened.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionConnector for FakeConnector {
        async fn open(&self, request: OpenRequest) -> Result<SessionSubscription, StreamError> {
            self.opened.lock().unwrap().push(request);
            let script = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Script::Events(vec![]));

            let (events, hold) = match script {
                Script::Refuse => {
                    return Err(StreamError::Connect {
                        endpoint: "fake".to_string(),
                        message: "connection refused".to_string(),
                    });
                }
                Script::Events(events) => (events, false),
                Script::EventsHeldOpen(events) => (events, true),
            };

            let (tx, rx) = mpsc::channel(events.len() + 8);
            for event in events {
                tx.try_send(event).unwrap();
            }
            if hold {
                self.held_senders.lock().unwrap().push(tx);
            }
            let token = CancellationToken::new();
            self.tokens.lock().unwrap().push(token.clone());
            Ok(SessionSubscription::new(rx, token))
        }
    }

    fn sample_board() -> BoardResult {
        BoardResult {
            executive_summary: "Summary".to_string(),
            strategic_options: vec![StrategicOption {
                option: "Pilot program".to_string(),
                pros: "Low risk".to_string(),
                cons: "Slow".to_string(),
                backing_evidence: "Market study".to_string(),
            }],
            risks_to_address: vec!["Churn".to_string()],
            final_verdict: "Run the pilot.".to_string(),
            raw_output: None,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        fail_board: Option<(u16, String)>,
        fail_diagram: bool,
        fail_report: bool,
    }

    #[async_trait]
    impl BoardApi for FakeApi {
        async fn run_board(&self, _query: &Query) -> Result<BoardResult, ApiError> {
            match &self.fail_board {
                Some((status, status_text)) => Err(ApiError::RequestFailed {
                    status: *status,
                    status_text: status_text.clone(),
                }),
                None => Ok(sample_board()),
            }
        }

        async fn render_diagram(&self, _board: &BoardResult) -> Result<DecisionDiagram, ApiError> {
            if self.fail_diagram {
                Err(ApiError::RequestFailed {
                    status: 503,
                    status_text: "Service Unavailable".to_string(),
                })
            } else {
                Ok(DecisionDiagram {
                    image_base64: "aGVsbG8=".to_string(),
                })
            }
        }

        async fn export_report(&self, _board: &BoardResult) -> Result<Vec<u8>, ApiError> {
            if self.fail_report {
                Err(ApiError::RequestFailed {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                })
            } else {
                Ok(b"%PDF-1.4 fake".to_vec())
            }
        }
    }

    fn deliberation_script() -> Script {
        Script::Events(vec![
            StreamEvent::update("TheAnalyst", "Hel"),
            StreamEvent::update("TheAnalyst", "lo"),
            StreamEvent::update("TheVisionary", "Hi"),
            StreamEvent::Completed,
        ])
    }

    fn orchestrator(
        connector: Arc<FakeConnector>,
        api: FakeApi,
    ) -> Orchestrator<FakeConnector, FakeApi> {
        Orchestrator::new(connector, Arc::new(api))
    }

    // Fragments aggregate per speaker and the session completes.
    #[tokio::test]
    async fn deliberation_aggregates_fragments_and_completes() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let mut orch = orchestrator(connector.clone(), FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::DecisionReady);
        let session = snapshot.session.unwrap();
        assert_eq!(*session.status(), SessionStatus::Completed);
        let texts: Vec<_> = session
            .messages()
            .iter()
            .map(|m| (m.speaker.as_str().to_string(), m.text.clone()))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("TheAnalyst".to_string(), "Hello".to_string()),
                ("TheVisionary".to_string(), "Hi".to_string()),
            ]
        );
        assert_eq!(snapshot.board.unwrap(), sample_board());
        assert!(snapshot.diagram.is_some());
    }

    // Diagram fetch failure is swallowed, no error recorded.
    #[tokio::test]
    async fn diagram_failure_is_not_fatal() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let api = FakeApi {
            fail_diagram: true,
            ..Default::default()
        };
        let mut orch = orchestrator(connector, api);

        orch.submit_query("Should we expand?").await.unwrap();

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::DecisionReady);
        assert!(snapshot.diagram.is_none());
        assert!(snapshot.last_error.is_none());
    }

    // Result fetch failure is fatal and the error carries the status.
    #[tokio::test]
    async fn result_fetch_failure_fails_the_flow() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let api = FakeApi {
            fail_board: Some((500, "Internal Server Error".to_string())),
            ..Default::default()
        };
        let mut orch = orchestrator(connector, api);

        let err = orch.submit_query("Should we expand?").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Deliberation(_)));

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::Failed);
        assert!(
            snapshot
                .last_error
                .unwrap()
                .contains("500 Internal Server Error")
        );
    }

    // Re-entrant execution requests are a no-op.
    #[tokio::test]
    async fn second_execution_request_is_a_no_op() {
        let connector = FakeConnector::scripted(vec![
            deliberation_script(),
            Script::Events(vec![
                StreamEvent::update("TheArchitect", "Planning"),
                StreamEvent::Completed,
            ]),
        ]);
        let mut orch = orchestrator(connector.clone(), FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        orch.request_execution().await.unwrap();
        assert_eq!(orch.phase(), AppPhase::Executing);

        orch.request_execution().await.unwrap();
        // One deliberation session plus exactly one execution session.
        assert_eq!(connector.open_count(), 2);
    }

    // Transport close without a terminal frame completes the execution
    // session.
    #[tokio::test]
    async fn execution_close_without_terminal_counts_as_completed() {
        let connector = FakeConnector::scripted(vec![
            deliberation_script(),
            Script::Events(vec![StreamEvent::update("TheEngineer", "Building...")]),
        ]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        orch.request_execution().await.unwrap();

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::Executing);
        let session = snapshot.session.unwrap();
        assert_eq!(*session.status(), SessionStatus::Completed);
    }

    #[tokio::test]
    async fn execution_error_frame_is_narrated_inline() {
        let connector = FakeConnector::scripted(vec![
            deliberation_script(),
            Script::Events(vec![
                StreamEvent::update("TheEngineer", "Building"),
                StreamEvent::Error("compiler exploded".to_string()),
            ]),
        ]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        orch.request_execution().await.unwrap();

        let snapshot = orch.snapshot();
        // The decision survives an execution failure.
        assert!(snapshot.board.is_some());
        let session = snapshot.session.unwrap();
        assert_eq!(*session.status(), SessionStatus::Errored);
        let last = session.messages().last().unwrap();
        assert!(last.speaker.is_system());
        assert!(last.text.contains("compiler exploded"));
    }

    #[tokio::test]
    async fn deliberation_stream_error_fails_the_flow() {
        let connector = FakeConnector::scripted(vec![Script::Events(vec![
            StreamEvent::update("TheAnalyst", "Hmm"),
            StreamEvent::Error("model overloaded".to_string()),
        ])]);
        let mut orch = orchestrator(connector, FakeApi::default());

        let err = orch.submit_query("Should we expand?").await.unwrap_err();
        assert!(err.to_string().contains("model overloaded"));
        assert_eq!(orch.phase(), AppPhase::Failed);
    }

    #[tokio::test]
    async fn deliberation_close_before_completion_fails_the_flow() {
        let connector = FakeConnector::scripted(vec![Script::Events(vec![
            StreamEvent::update("TheAnalyst", "Hmm"),
        ])]);
        let mut orch = orchestrator(connector, FakeApi::default());

        let err = orch.submit_query("Should we expand?").await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Deliberation(DeliberationError::ClosedEarly)
        ));
        assert_eq!(orch.phase(), AppPhase::Failed);
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let connector = FakeConnector::scripted(vec![]);
        let mut orch = orchestrator(connector.clone(), FakeApi::default());

        let err = orch.submit_query("   ").await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidQuery(DomainError::EmptyQuery)
        ));
        assert_eq!(orch.phase(), AppPhase::Idle);
        assert_eq!(connector.open_count(), 0);
    }

    #[tokio::test]
    async fn submit_is_rejected_outside_idle() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        let err = orch.submit_query("Another question").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NotIdle(_)));
    }

    #[tokio::test]
    async fn reset_discards_all_derived_state() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        orch.reset();

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::Idle);
        assert!(snapshot.query.is_none());
        assert!(snapshot.session.is_none());
        assert!(snapshot.board.is_none());
        assert!(snapshot.diagram.is_none());
        assert!(snapshot.last_error.is_none());
    }

    // Late frames from a discarded session can never reach a newer session.
    #[tokio::test]
    async fn stale_frames_never_reach_a_new_session() {
        let connector = FakeConnector::scripted(vec![
            Script::EventsHeldOpen(vec![
                StreamEvent::update("TheAnalyst", "First run"),
                StreamEvent::Completed,
            ]),
            deliberation_script(),
        ]);
        let mut orch = orchestrator(connector.clone(), FakeApi::default());

        orch.submit_query("First question").await.unwrap();
        orch.reset();

        // The first session's sender is still alive; its frames are now in
        // flight toward a discarded subscription.
        let stale_sender = connector.held_senders.lock().unwrap().remove(0);
        assert!(
            stale_sender
                .send(StreamEvent::update("TheGhost", "late frame"))
                .await
                .is_err(),
            "discarded subscription must not accept frames"
        );

        orch.submit_query("Second question").await.unwrap();
        let session = orch.snapshot().session.unwrap();
        assert!(
            session
                .messages()
                .iter()
                .all(|m| m.speaker.as_str() != "TheGhost")
        );
    }

    #[tokio::test]
    async fn connection_is_released_after_the_stream_ends() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let mut orch = orchestrator(connector.clone(), FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();

        let tokens = connector.tokens.lock().unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_cancelled());
    }

    #[tokio::test]
    async fn execution_connect_failure_keeps_the_decision() {
        let connector = FakeConnector::scripted(vec![deliberation_script(), Script::Refuse]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        orch.request_execution().await.unwrap();

        let snapshot = orch.snapshot();
        assert_eq!(snapshot.phase, AppPhase::Executing);
        assert!(snapshot.board.is_some());
        assert_eq!(
            *snapshot.session.unwrap().status(),
            SessionStatus::Errored
        );
    }

    #[tokio::test]
    async fn execution_request_requires_a_decision() {
        let connector = FakeConnector::scripted(vec![]);
        let mut orch = orchestrator(connector, FakeApi::default());

        let err = orch.request_execution().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NoDecision(AppPhase::Idle)));
    }

    #[tokio::test]
    async fn report_export_does_not_change_state() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let mut orch = orchestrator(connector, FakeApi::default());

        orch.submit_query("Should we expand?").await.unwrap();
        let report = orch.export_report().await.unwrap();
        assert!(report.filename.starts_with("The_Council_Report_"));
        assert!(report.filename.ends_with(".pdf"));
        assert!(!report.bytes.is_empty());
        assert_eq!(orch.phase(), AppPhase::DecisionReady);
    }

    #[tokio::test]
    async fn report_export_failure_leaves_state_untouched() {
        let connector = FakeConnector::scripted(vec![deliberation_script()]);
        let api = FakeApi {
            fail_report: true,
            ..Default::default()
        };
        let mut orch = orchestrator(connector, api);

        orch.submit_query("Should we expand?").await.unwrap();
        let err = orch.export_report().await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Export(_)));
        assert_eq!(orch.phase(), AppPhase::DecisionReady);
    }
}
