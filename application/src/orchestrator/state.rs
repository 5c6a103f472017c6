//! Application state snapshot
//!
//! The orchestrator owns a single [`AppSnapshot`] and replaces it wholesale
//! on every transition; concurrent readers (via `watch`) always observe a
//! consistent snapshot, never a partially-updated one.

use council_domain::{BoardResult, DecisionDiagram, Query, Session};

/// Top-level application phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Idle,
    Deliberating,
    DecisionReady,
    Executing,
    Failed,
}

impl AppPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppPhase::Idle => "idle",
            AppPhase::Deliberating => "deliberating",
            AppPhase::DecisionReady => "decision-ready",
            AppPhase::Executing => "executing",
            AppPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AppPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable snapshot of the whole application state.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub phase: AppPhase,
    pub query: Option<Query>,
    /// The most recent session (live or terminal). A new session discards
    /// the previous one.
    pub session: Option<Session>,
    pub board: Option<BoardResult>,
    pub diagram: Option<DecisionDiagram>,
    pub last_error: Option<String>,
}
