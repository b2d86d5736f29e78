// Beat matrix - authoritative record of the beat → sounds schedule

use crate::audio::backend::SoundId;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mapping from beat index to the set of sounds scheduled on that beat.
///
/// Every index in `0..beats_in_measure` exists for the whole lifetime of the
/// matrix; no index outside that range is ever created. Set semantics per
/// beat: a sound is either scheduled or not, re-adding is a no-op.
///
/// One coarse lock guards the whole matrix. All methods take `&self` so the
/// matrix can be shared behind an `Arc` between the UI thread (mutations) and
/// the clock thread (`sounds_at` once per tick). The lock is held only for
/// set mutation or snapshotting, never across audio calls.
pub struct BeatMatrix {
    beats_in_measure: usize,
    slots: Mutex<Vec<HashSet<SoundId>>>,
}

impl BeatMatrix {
    pub fn new(beats_in_measure: usize) -> Self {
        assert!(
            beats_in_measure > 0,
            "measure must contain at least one beat"
        );
        Self {
            beats_in_measure,
            slots: Mutex::new(vec![HashSet::new(); beats_in_measure]),
        }
    }

    pub fn beats_in_measure(&self) -> usize {
        self.beats_in_measure
    }

    fn check_beat(&self, beat: usize) {
        // Out-of-range indices are a caller bug, not a runtime condition.
        assert!(
            beat < self.beats_in_measure,
            "beat index {} out of range (measure has {} beats)",
            beat,
            self.beats_in_measure
        );
    }

    /// Schedule `sound` on `beat`. Scheduling an already-present sound is a
    /// no-op.
    pub fn schedule(&self, beat: usize, sound: SoundId) {
        self.check_beat(beat);
        self.slots.lock().unwrap()[beat].insert(sound);
    }

    /// Remove `sound` from `beat`. Returns whether it was scheduled there.
    pub fn unschedule(&self, beat: usize, sound: SoundId) -> bool {
        self.check_beat(beat);
        self.slots.lock().unwrap()[beat].remove(&sound)
    }

    /// Schedule the same sound across a batch of beats (a loop pad maps to a
    /// fixed list of beat offsets). Each beat is applied atomically; the
    /// batch as a whole is not.
    pub fn schedule_all(&self, beats: &[usize], sound: SoundId) {
        for &beat in beats {
            self.schedule(beat, sound);
        }
    }

    /// Remove the same sound from a batch of beats.
    pub fn unschedule_all(&self, beats: &[usize], sound: SoundId) {
        for &beat in beats {
            self.unschedule(beat, sound);
        }
    }

    /// Empty every beat's set ("reset all").
    pub fn clear(&self) {
        for slot in self.slots.lock().unwrap().iter_mut() {
            slot.clear();
        }
    }

    /// Snapshot of the sounds scheduled on `beat`, taken under the lock so a
    /// concurrent mutation can never be observed half-applied.
    pub fn sounds_at(&self, beat: usize) -> Vec<SoundId> {
        self.check_beat(beat);
        self.slots.lock().unwrap()[beat].iter().copied().collect()
    }

    /// Number of sounds scheduled on `beat`.
    pub fn scheduled_count(&self, beat: usize) -> usize {
        self.check_beat(beat);
        self.slots.lock().unwrap()[beat].len()
    }

    /// Whether no beat has anything scheduled.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().unwrap().iter().all(HashSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::next_sound_id;

    #[test]
    fn test_all_beats_present_and_empty() {
        let matrix = BeatMatrix::new(16);
        assert_eq!(matrix.beats_in_measure(), 16);
        assert!(matrix.is_empty());
        for beat in 0..16 {
            assert!(matrix.sounds_at(beat).is_empty());
        }
    }

    #[test]
    fn test_schedule_then_unschedule() {
        let matrix = BeatMatrix::new(16);
        let sound = next_sound_id();

        matrix.schedule(3, sound);
        assert_eq!(matrix.sounds_at(3), vec![sound]);

        assert!(matrix.unschedule(3, sound));
        assert!(matrix.sounds_at(3).is_empty());
    }

    #[test]
    fn test_schedule_is_idempotent() {
        let matrix = BeatMatrix::new(16);
        let sound = next_sound_id();

        matrix.schedule(5, sound);
        matrix.schedule(5, sound);
        assert_eq!(matrix.scheduled_count(5), 1);

        // A single removal fully unschedules it.
        assert!(matrix.unschedule(5, sound));
        assert_eq!(matrix.scheduled_count(5), 0);
    }

    #[test]
    fn test_unschedule_absent_reports_not_found() {
        let matrix = BeatMatrix::new(16);
        let scheduled = next_sound_id();
        let absent = next_sound_id();

        matrix.schedule(7, scheduled);
        assert!(!matrix.unschedule(7, absent));
        assert_eq!(matrix.sounds_at(7), vec![scheduled]);
    }

    #[test]
    fn test_distinct_sounds_coexist_on_a_beat() {
        let matrix = BeatMatrix::new(16);
        let kick = next_sound_id();
        let snare = next_sound_id();

        matrix.schedule(0, kick);
        matrix.schedule(0, snare);

        let mut at_zero = matrix.sounds_at(0);
        at_zero.sort();
        let mut expected = vec![kick, snare];
        expected.sort();
        assert_eq!(at_zero, expected);
    }

    #[test]
    fn test_batch_schedule_and_unschedule() {
        let matrix = BeatMatrix::new(16);
        let loop_sound = next_sound_id();
        let beats = [2, 6, 10, 14];

        matrix.schedule_all(&beats, loop_sound);
        for &beat in &beats {
            assert_eq!(matrix.scheduled_count(beat), 1);
        }
        assert!(matrix.sounds_at(0).is_empty());

        // Re-applying the batch never doubles up on any single beat.
        matrix.schedule_all(&beats, loop_sound);
        for &beat in &beats {
            assert_eq!(matrix.scheduled_count(beat), 1);
        }

        matrix.unschedule_all(&beats, loop_sound);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_clear_empties_every_beat() {
        let matrix = BeatMatrix::new(16);
        let a = next_sound_id();
        let b = next_sound_id();

        for beat in 0..16 {
            matrix.schedule(beat, a);
        }
        matrix.schedule(9, b);

        matrix.clear();
        assert!(matrix.is_empty());
        for beat in 0..16 {
            assert!(matrix.sounds_at(beat).is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_schedule_out_of_range_fails_fast() {
        let matrix = BeatMatrix::new(16);
        matrix.schedule(16, next_sound_id());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_sounds_at_out_of_range_fails_fast() {
        let matrix = BeatMatrix::new(16);
        matrix.sounds_at(99);
    }

    #[test]
    fn test_concurrent_mutation_and_snapshot() {
        use std::sync::Arc;
        use std::thread;

        let matrix = Arc::new(BeatMatrix::new(16));
        let sound = next_sound_id();

        let writer = {
            let matrix = Arc::clone(&matrix);
            thread::spawn(move || {
                for _ in 0..1000 {
                    matrix.schedule(3, sound);
                    matrix.unschedule(3, sound);
                }
            })
        };

        // Every snapshot sees the sound either fully present or fully absent.
        for _ in 0..1000 {
            let snapshot = matrix.sounds_at(3);
            assert!(snapshot.is_empty() || snapshot == vec![sound]);
        }

        writer.join().unwrap();
    }
}
