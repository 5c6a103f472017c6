//! Export Report use case
//!
//! Fetches the board result as a binary document and names the file with
//! the current date. Export failure is surfaced to the caller as a one-shot
//! error and never touches orchestrator state.

use std::sync::Arc;

use chrono::Utc;
use council_domain::BoardResult;
use tracing::info;

use crate::ports::board_api::{ApiError, BoardApi};

/// A downloadable report document.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Use case for exporting the board report document.
pub struct ExportReportUseCase<A: BoardApi> {
    api: Arc<A>,
}

impl<A: BoardApi> ExportReportUseCase<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn execute(&self, board: &BoardResult) -> Result<ReportFile, ApiError> {
        let bytes = self.api.export_report(board).await?;
        let filename = format!("The_Council_Report_{}.pdf", Utc::now().format("%Y-%m-%d"));
        info!("Report exported ({} bytes) as {}", bytes.len(), filename);
        Ok(ReportFile { filename, bytes })
    }
}
