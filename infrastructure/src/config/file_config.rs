//! Configuration file schema

use serde::{Deserialize, Serialize};

/// Root configuration structure (matches `council.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub output: OutputConfig,
}

/// Board service location. The base endpoint address is the only value the
/// core requires; the WebSocket scheme is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Console output preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize console output.
    pub color: bool,
    /// Show the live deliberation transcript while streaming.
    pub show_transcript: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_transcript: true,
        }
    }
}
