// Engine configuration - construction-time sequencer parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sequencer parameters fixed at engine construction.
///
/// An embedding application may persist these alongside its own settings;
/// the engine itself never reads or writes storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Number of discrete beats in one cycle of the measure.
    pub beats_in_measure: usize,

    /// Wall-clock period between beats, in milliseconds.
    pub tick_interval_ms: u64,
}

impl SequencerConfig {
    /// Creates a config, failing fast on degenerate values.
    pub fn new(beats_in_measure: usize, tick_interval_ms: u64) -> Self {
        assert!(
            beats_in_measure > 0,
            "measure must contain at least one beat"
        );
        assert!(tick_interval_ms > 0, "tick interval must be non-zero");
        Self {
            beats_in_measure,
            tick_interval_ms,
        }
    }

    /// Tick period as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for SequencerConfig {
    /// 16 beats every 250 ms: one measure per 4 seconds, 240 BPM at
    /// 16th-note resolution.
    fn default() -> Self {
        Self {
            beats_in_measure: 16,
            tick_interval_ms: 250,
        }
    }
}
