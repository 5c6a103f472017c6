//! Board result entities
//!
//! The [`BoardResult`] is produced once per successful deliberation and is
//! immutable thereafter. It seeds diagram rendering, report export, and the
//! execution phase (via `final_verdict`). Field names match the wire format.

use serde::{Deserialize, Serialize};

/// One strategic option weighed by the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicOption {
    pub option: String,
    pub pros: String,
    pub cons: String,
    pub backing_evidence: String,
}

/// The structured outcome of a completed deliberation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardResult {
    pub executive_summary: String,
    pub strategic_options: Vec<StrategicOption>,
    pub risks_to_address: Vec<String>,
    pub final_verdict: String,
    /// Raw orchestrator output, when the server chooses to include it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<serde_json::Value>,
}

/// A rendered decision diagram, as delivered by the visualization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDiagram {
    pub image_base64: String,
}
