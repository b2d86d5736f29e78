// Audio collaborator boundary - the engine decides when to trigger, the
// backend decides how sound comes out

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Opaque handle to a playable clip, owned by the audio backend.
///
/// The engine only stores and compares handles; it never inspects audio
/// content. Identity is stable, so a handle scheduled on a beat can later be
/// unscheduled with an equal handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u64);

/// Global sound ID generator (atomic for thread-safety).
static NEXT_SOUND_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh sound handle. Called by whatever loads clips into a
/// backend; the engine itself only consumes handles.
pub fn next_sound_id() -> SoundId {
    SoundId(NEXT_SOUND_ID.fetch_add(1, Ordering::Relaxed))
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound #{}", self.0)
    }
}

/// Why a trigger could not be serviced.
///
/// Recovered locally wherever it occurs: the affected sound is skipped this
/// tick, the rest of the batch and the loop continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("no clip registered for {0}")]
    UnknownSound(SoundId),

    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Playback collaborator the clock dispatches into.
///
/// Implementations must tolerate calls from the clock thread and the UI
/// thread concurrently. `set_volume` persists on the sound: a later `play`
/// without an intervening `set_volume` uses the last level set.
pub trait AudioBackend: Send + Sync {
    /// Start the sound from the beginning.
    fn play(&self, sound: SoundId) -> Result<(), PlaybackError>;

    /// Silence the sound. A no-op if it is not currently sounding.
    fn stop(&self, sound: SoundId);

    /// Whether the sound is currently sounding.
    fn is_playing(&self, sound: SoundId) -> bool;

    /// Set the playback level for this sound, `level` in `[0.0, 1.0]`.
    fn set_volume(&self, sound: SoundId, level: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_ids_unique() {
        let a = next_sound_id();
        let b = next_sound_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sound_id_comparable() {
        let id = next_sound_id();
        let copy = id;
        assert_eq!(id, copy);

        let later = next_sound_id();
        assert!(id < later);
    }
}
