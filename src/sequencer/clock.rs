// Sequencer clock - drives playback at a steady cadence on its own thread

use crate::audio::backend::AudioBackend;
use crate::audio::parameters::MasterVolume;
use crate::sequencer::matrix::BeatMatrix;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// The UI counter is told about the cursor once per quarter measure.
const COUNTER_NOTIFY_INTERVAL: usize = 4;

/// The notification target is no longer reachable.
///
/// Returned by a [`TickObserver`] whose receiving side has been torn down.
/// The clock treats it as the normal stop signal, not a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tick observer disconnected")]
pub struct ObserverGone;

/// UI-side collaborator notified as the cursor crosses quarter boundaries.
///
/// Invoked from the clock thread, only on beats where `beat % 4 == 0`; the
/// observer is responsible for any hand-off needed to update visible state.
pub trait TickObserver: Send {
    fn on_tick_boundary(&mut self, beat: usize) -> Result<(), ObserverGone>;
}

/// Clock state as seen from outside the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

/// One beat's worth of work, factored out of the thread loop so the timing
/// behavior is testable without threads or sleeps.
struct Ticker<B: AudioBackend, O: TickObserver> {
    matrix: Arc<BeatMatrix>,
    backend: Arc<B>,
    volume: MasterVolume,
    observer: O,
    position: Arc<AtomicUsize>,
    cursor: usize,
    beats_in_measure: usize,
}

impl<B: AudioBackend, O: TickObserver> Ticker<B, O> {
    fn tick(&mut self) -> Result<(), ObserverGone> {
        self.position.store(self.cursor, Ordering::Relaxed);

        // Snapshot first: no audio call happens under the matrix lock.
        for sound in self.matrix.sounds_at(self.cursor) {
            // A hit restarts the clip from the beginning rather than
            // overlapping an unfinished play of the same clip.
            if self.backend.is_playing(sound) {
                self.backend.stop(sound);
            }
            self.backend.set_volume(sound, self.volume.get());
            if let Err(err) = self.backend.play(sound) {
                // Skip this sound for this tick only; no retry.
                eprintln!("beat {}: skipping {}: {}", self.cursor, sound, err);
            }
        }

        if self.cursor % COUNTER_NOTIFY_INTERVAL == 0 {
            self.observer.on_tick_boundary(self.cursor)?;
        }

        self.cursor = (self.cursor + 1) % self.beats_in_measure;
        Ok(())
    }
}

/// Handle to a running clock thread.
///
/// `stop()` is observed within at most one tick period. Dropping the handle
/// also signals the thread to stop, but does not wait for it.
pub struct ClockHandle {
    stop_flag: Arc<AtomicBool>,
    position: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl ClockHandle {
    /// Beat currently being played. Owned exclusively by the clock; everyone
    /// else gets this read-only view.
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> ClockState {
        if self.is_running() {
            ClockState::Running
        } else {
            ClockState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the loop to stop and wait for it to exit its current tick.
    pub fn stop(mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }
}

/// Spawn the clock thread and start ticking from beat 0.
///
/// Every `tick_interval` the clock reads the matrix at the cursor, dispatches
/// each due sound to the backend (stop-if-sounding, apply shared volume,
/// play), notifies the observer on quarter boundaries, advances modulo the
/// measure length, and sleeps away the rest of the period. Cadence is
/// wall-clock; drift is not compensated.
///
/// The loop exits when the handle signals stop or the observer goes away.
pub fn start_clock<B, O>(
    matrix: Arc<BeatMatrix>,
    backend: Arc<B>,
    volume: MasterVolume,
    observer: O,
    tick_interval: Duration,
) -> ClockHandle
where
    B: AudioBackend + 'static,
    O: TickObserver + 'static,
{
    let stop_flag = Arc::new(AtomicBool::new(false));
    let position = Arc::new(AtomicUsize::new(0));

    let mut ticker = Ticker {
        beats_in_measure: matrix.beats_in_measure(),
        matrix,
        backend,
        volume,
        observer,
        position: Arc::clone(&position),
        cursor: 0,
    };

    let stop = Arc::clone(&stop_flag);
    let thread = thread::Builder::new()
        .name("beatpad-clock".into())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let tick_start = Instant::now();
                if ticker.tick().is_err() {
                    // Observer gone: same as the stop signal.
                    break;
                }
                thread::sleep(tick_interval.saturating_sub(tick_start.elapsed()));
            }
        })
        .expect("failed to spawn clock thread");

    ClockHandle {
        stop_flag,
        position,
        thread: Some(thread),
    }
}
