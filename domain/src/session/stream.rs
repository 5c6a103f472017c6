//! Streaming events and the fragment aggregator.
//!
//! [`StreamEvent`] represents one decoded inbound frame from a streaming
//! phase. [`Transcript`] folds an ordered event sequence into ordered,
//! per-speaker messages: the run-length-encoded-by-speaker projection of
//! the event sequence.

use serde::{Deserialize, Serialize};

use super::entities::{Message, Speaker};

/// One decoded inbound frame from a streaming session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A fragment of currently-speaking text.
    Update { speaker: Speaker, delta: String },
    /// The stream finished normally; no further events follow.
    Completed,
    /// A fatal condition; no further events follow except an implied close.
    Error(String),
}

impl StreamEvent {
    pub fn update(speaker: impl Into<Speaker>, delta: impl Into<String>) -> Self {
        StreamEvent::Update {
            speaker: speaker.into(),
            delta: delta.into(),
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}

/// Ordered per-speaker messages reassembled from stream fragments.
///
/// Invariants:
/// - no two adjacent messages share a speaker;
/// - replaying all `Update` deltas for a message in arrival order
///   reconstructs its `text` byte-for-byte.
///
/// Applying an event is O(1) amortized: only the last message is ever
/// inspected, never the full history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Fold one event into the transcript.
    ///
    /// `Completed` and `Error` do not mutate the message list; they are
    /// signals consumed by the session layer. Error narration (a "System"
    /// message shown to the human) is appended explicitly by the caller
    /// via [`Transcript::narrate`].
    pub fn apply(&mut self, event: &StreamEvent) {
        if let StreamEvent::Update { speaker, delta } = event {
            self.push_delta(speaker, delta);
        }
    }

    /// Append one fragment for `speaker`, extending the last message when
    /// the speaker continues.
    pub fn push_delta(&mut self, speaker: &Speaker, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if last.speaker == *speaker => last.text.push_str(delta),
            _ => self.messages.push(Message::new(speaker.clone(), delta)),
        }
    }

    /// Append a synthesized "System" message (control/error narration).
    pub fn narrate(&mut self, text: impl Into<String>) {
        self.messages.push(Message::new(Speaker::system(), text));
    }
}
