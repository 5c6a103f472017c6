//! HTTP client for the board service's request/response operations.
//!
//! Three endpoints, all `POST`, all fire-once (no retries here):
//!
//! - `/api/v1/board/run`: `{query}` in, structured board result out
//! - `/api/v1/board/visualize`: board result in, `{image_base64}` out
//! - `/api/v1/board/report`: board result in, binary document out

use async_trait::async_trait;
use council_application::ports::board_api::{ApiError, BoardApi};
use council_domain::{BoardResult, DecisionDiagram, Query};
use serde_json::json;
use tracing::debug;

/// Board API over a shared `reqwest` client.
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoardApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn run_board(&self, query: &Query) -> Result<BoardResult, ApiError> {
        let response = self
            .post_json("/api/v1/board/run", &json!({ "query": query.content() }))
            .await?;
        response
            .json::<BoardResult>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn render_diagram(&self, board: &BoardResult) -> Result<DecisionDiagram, ApiError> {
        let response = self.post_json("/api/v1/board/visualize", board).await?;
        response
            .json::<DecisionDiagram>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn export_report(&self, board: &BoardResult) -> Result<Vec<u8>, ApiError> {
        let response = self.post_json("/api/v1/board/report", board).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
