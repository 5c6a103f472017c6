//! WebSocket streaming session adapter.

pub mod client;
pub mod protocol;
