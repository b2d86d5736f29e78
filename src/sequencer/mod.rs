// Sequencer - the beat matrix, the timing loop, and the engine facade

pub mod clock;
pub mod engine;
pub mod matrix;

pub use clock::{ClockHandle, ClockState, ObserverGone, TickObserver, start_clock};
pub use engine::BeatEngine;
pub use matrix::BeatMatrix;
