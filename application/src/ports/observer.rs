//! Session observation port
//!
//! Presentation-layer callbacks for live transcript display. All methods
//! default to no-ops so observers implement only what they need.

use council_domain::{Phase, SessionStatus, Speaker};

/// Callbacks fired while a streaming session is live.
///
/// Implementations live in the presentation layer (console reporter, etc.).
pub trait SessionObserver: Send + Sync {
    /// Called once the session connection is established.
    fn on_session_open(&self, _phase: Phase) {}

    /// Called when the speaking persona changes (including the first one).
    fn on_speaker_change(&self, _speaker: &Speaker) {}

    /// Called for each text fragment of the current speaker.
    fn on_delta(&self, _speaker: &Speaker, _delta: &str) {}

    /// Called exactly once when the session reaches a terminal status.
    fn on_session_end(&self, _phase: Phase, _status: &SessionStatus) {}
}

/// No-op observer for headless runs and tests.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
