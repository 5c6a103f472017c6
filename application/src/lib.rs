//! Application layer for council
//!
//! This crate contains the use cases, ports (trait interfaces for
//! infrastructure), and the application orchestrator state machine.

pub mod orchestrator;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use orchestrator::{
    state::{AppPhase, AppSnapshot},
    Orchestrator, OrchestratorError,
};
pub use ports::{
    board_api::{ApiError, BoardApi},
    observer::{NoopObserver, SessionObserver},
    streaming::{OpenRequest, SessionConnector, SessionSubscription, StreamError},
};
pub use use_cases::{
    export_report::{ExportReportUseCase, ReportFile},
    run_deliberation::{Decision, DeliberationError, RunDeliberationUseCase},
    run_execution::RunExecutionUseCase,
};
