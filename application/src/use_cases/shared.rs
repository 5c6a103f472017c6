//! Helpers shared by the streaming use cases.

use council_domain::{Session, Speaker};

use crate::ports::observer::SessionObserver;

/// Fold one text fragment into the session transcript, firing observer
/// callbacks for speaker changes and deltas.
pub(crate) fn fold_update(
    session: &mut Session,
    speaker: &Speaker,
    delta: &str,
    observer: &dyn SessionObserver,
) {
    let speaker_changed = session.active_speaker() != Some(speaker);
    session.transcript_mut().push_delta(speaker, delta);
    if speaker_changed {
        observer.on_speaker_change(speaker);
    }
    observer.on_delta(speaker, delta);
}
