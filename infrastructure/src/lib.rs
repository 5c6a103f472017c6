//! Infrastructure layer for council
//!
//! Adapters for the board service: the WebSocket streaming session client,
//! the HTTP board API client, and the configuration loader.

pub mod api;
pub mod config;
pub mod ws;

// Re-export commonly used types
pub use api::client::HttpBoardApi;
pub use config::{
    file_config::{FileConfig, OutputConfig, ServerConfig},
    loader::ConfigLoader,
};
pub use ws::client::WsSessionConnector;
