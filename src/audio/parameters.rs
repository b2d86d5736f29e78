// Atomic parameters - lock-free sharing between the UI thread and the clock thread

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe f32 parameter using atomic operations.
/// Converts f32 to u32 bits for atomic storage.
#[derive(Clone)]
pub struct AtomicF32 {
    inner: Arc<AtomicU32>,
}

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self {
            inner: Arc::new(AtomicU32::new(value.to_bits())),
        }
    }

    /// Set the value (called from the UI thread).
    pub fn set(&self, value: f32) {
        self.inner.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Get the value (called from the clock thread).
    pub fn get(&self) -> f32 {
        f32::from_bits(self.inner.load(Ordering::Relaxed))
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Shared playback volume in `[0.0, 1.0]`.
///
/// Written by the UI (volume slider), read by the clock at every scheduled
/// trigger. Strict ordering with ticks is not required: the next tick picks up
/// the latest value. Cloning shares the same underlying level.
#[derive(Clone)]
pub struct MasterVolume {
    level: AtomicF32,
}

impl MasterVolume {
    pub fn new(level: f32) -> Self {
        Self {
            level: AtomicF32::new(level.clamp(0.0, 1.0)),
        }
    }

    /// Set the level, clamped into `[0.0, 1.0]`.
    pub fn set(&self, level: f32) {
        self.level.set(level.clamp(0.0, 1.0));
    }

    /// Set from a `0..=100` slider value.
    pub fn set_percent(&self, percent: f64) {
        self.set((percent / 100.0) as f32);
    }

    pub fn get(&self) -> f32 {
        self.level.get()
    }
}

impl Default for MasterVolume {
    /// The volume the engine starts with before the UI touches the slider.
    fn default() -> Self {
        Self::new(0.8)
    }
}
