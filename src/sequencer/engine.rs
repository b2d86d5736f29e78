// Beat engine - facade owning the schedule, the shared volume, and the clock

use crate::audio::backend::{AudioBackend, PlaybackError, SoundId};
use crate::audio::parameters::MasterVolume;
use crate::config::SequencerConfig;
use crate::sequencer::clock::{ClockHandle, TickObserver, start_clock};
use crate::sequencer::matrix::BeatMatrix;
use std::sync::Arc;

/// The engine a UI talks to.
///
/// Owns the beat matrix, the shared volume, the audio backend, and at most
/// one running clock. Schedule mutations and volume changes are safe to call
/// from the UI thread while the clock is running; the clock never blocks the
/// UI and the UI never blocks the clock.
pub struct BeatEngine<B: AudioBackend> {
    config: SequencerConfig,
    matrix: Arc<BeatMatrix>,
    volume: MasterVolume,
    backend: Arc<B>,
    clock: Option<ClockHandle>,
}

impl<B: AudioBackend + 'static> BeatEngine<B> {
    pub fn new(backend: B, config: SequencerConfig) -> Self {
        Self {
            matrix: Arc::new(BeatMatrix::new(config.beats_in_measure)),
            volume: MasterVolume::default(),
            backend: Arc::new(backend),
            config,
            clock: None,
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Shared handle to the schedule, for a UI that wants to hold it directly.
    pub fn matrix(&self) -> &Arc<BeatMatrix> {
        &self.matrix
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    // Schedule passthroughs.

    pub fn schedule(&self, beat: usize, sound: SoundId) {
        self.matrix.schedule(beat, sound);
    }

    pub fn unschedule(&self, beat: usize, sound: SoundId) -> bool {
        self.matrix.unschedule(beat, sound)
    }

    /// Toggle a loop pad on: one sound across its fixed list of beat offsets.
    pub fn schedule_all(&self, beats: &[usize], sound: SoundId) {
        self.matrix.schedule_all(beats, sound);
    }

    pub fn unschedule_all(&self, beats: &[usize], sound: SoundId) {
        self.matrix.unschedule_all(beats, sound);
    }

    /// "Reset all": silence the schedule without stopping the clock.
    pub fn clear(&self) {
        self.matrix.clear();
    }

    /// Set the shared playback volume, `level` clamped into `[0.0, 1.0]`.
    pub fn set_volume(&self, level: f32) {
        self.volume.set(level);
    }

    /// Set the volume from a `0..=100` slider.
    pub fn set_volume_percent(&self, percent: f64) {
        self.volume.set_percent(percent);
    }

    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    /// Play a sample pad right now, independent of the beat cursor.
    ///
    /// Restarts the clip if it is already sounding. Deliberately does not
    /// apply the shared volume: sample pads play at the clip's native level,
    /// only scheduled hits are volumed.
    pub fn trigger_sample(&self, sound: SoundId) -> Result<(), PlaybackError> {
        if self.backend.is_playing(sound) {
            self.backend.stop(sound);
        }
        self.backend.play(sound)
    }

    /// Start the clock from beat 0. A no-op if it is already running.
    pub fn start<O: TickObserver + 'static>(&mut self, observer: O) {
        if self.is_running() {
            return;
        }
        self.clock = Some(start_clock(
            Arc::clone(&self.matrix),
            Arc::clone(&self.backend),
            self.volume.clone(),
            observer,
            self.config.tick_interval(),
        ));
    }

    /// Stop the clock and wait for its final tick. A no-op when stopped.
    pub fn stop(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.as_ref().is_some_and(ClockHandle::is_running)
    }

    /// Beat the clock last played, 0 when the clock has never run.
    pub fn position(&self) -> usize {
        self.clock.as_ref().map_or(0, ClockHandle::position)
    }
}
