//! Session domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stream::Transcript;

/// Identity of a persona speaking on a stream (Value Object)
///
/// Opaque; the core never enumerates personas. The distinguished
/// [`Speaker::system`] identity is used for control and error narration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speaker(String);

impl Speaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The "System" identity used for control/error narration.
    pub fn system() -> Self {
        Self("System".to_string())
    }

    pub fn is_system(&self) -> bool {
        self.0 == "System"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Speaker {
    fn from(s: &str) -> Self {
        Speaker::new(s)
    }
}

impl From<String> for Speaker {
    fn from(s: String) -> Self {
        Speaker::new(s)
    }
}

/// One complete per-speaker utterance in a transcript (Entity)
///
/// `text` grows by concatenation while the same speaker continues; a new
/// message begins whenever the speaker changes. `created_at` is
/// informational only and never affects ordering or equality of `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Which streaming phase a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Deliberation,
    Execution,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Deliberation => "deliberation",
            Phase::Execution => "execution",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Connecting,
    Active,
    Completed,
    Errored,
    Closed,
}

impl SessionStatus {
    /// A terminal status admits no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Errored | SessionStatus::Closed
        )
    }
}

/// Runtime state of one streaming phase (Entity)
///
/// Exactly one session is live at a time; opening a new one discards the
/// previous session's connection resources.
#[derive(Debug, Clone)]
pub struct Session {
    id: u64,
    phase: Phase,
    status: SessionStatus,
    transcript: Transcript,
}

impl Session {
    pub fn new(id: u64, phase: Phase) -> Self {
        Self {
            id,
            phase,
            status: SessionStatus::Connecting,
            transcript: Transcript::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// The persona currently speaking, if any fragment has arrived yet.
    pub fn active_speaker(&self) -> Option<&Speaker> {
        self.transcript.messages().last().map(|m| &m.speaker)
    }
}
