//! Wire protocol for the streaming endpoints.
//!
//! Both phases speak the same inbound frame shape, tagged by `type`:
//!
//! - `{"type":"update","agent":...,"text":...}`: a speaker fragment
//! - `{"type":"complete"}`: normal end of stream
//! - `{"type":"error","message":...}`: fatal condition
//!
//! A frame that fails to decode (bad JSON, unrecognized `type`) is dropped
//! by the client after logging; it never terminates the session.

use council_domain::{Speaker, StreamEvent};
use serde::Deserialize;

/// One inbound server frame.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    Update { agent: String, text: String },
    Complete,
    Error { message: String },
}

impl ServerFrame {
    pub fn into_event(self) -> StreamEvent {
        match self {
            ServerFrame::Update { agent, text } => StreamEvent::Update {
                speaker: Speaker::new(agent),
                delta: text,
            },
            ServerFrame::Complete => StreamEvent::Completed,
            ServerFrame::Error { message } => StreamEvent::Error(message),
        }
    }
}

/// Decode one inbound text frame. Pure; called once per frame in the
/// reader loop.
pub fn parse_frame(raw: &str) -> Result<ServerFrame, serde_json::Error> {
    serde_json::from_str(raw)
}
