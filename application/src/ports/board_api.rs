//! Board API port
//!
//! The result fetcher: three independent request/response operations,
//! invoked only after the deliberation stream signals completion (report
//! export is on demand). Each call is fire-once; the core never retries.

use async_trait::async_trait;
use council_domain::{BoardResult, DecisionDiagram, Query};
use thiserror::Error;

/// Errors from the request/response side of the board service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("Request failed: {status} {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// The request never got an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Request/response operations against the board service.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetch the structured deliberation result.
    async fn run_board(&self, query: &Query) -> Result<BoardResult, ApiError>;

    /// Render the decision diagram for a board result.
    async fn render_diagram(&self, board: &BoardResult) -> Result<DecisionDiagram, ApiError>;

    /// Export the board result as a binary document.
    async fn export_report(&self, board: &BoardResult) -> Result<Vec<u8>, ApiError>;
}
