// Beatpad - beat-sequencing engine for a drum-machine style pad application
//
// The engine decides *when* sounds fire: a fixed-length cyclic measure of
// beats, a matrix recording which sounds trigger on which beat, and a clock
// thread that walks the measure at a steady tempo and dispatches into an
// audio collaborator. Widget layout, key bindings, and audio decode/output
// live outside this crate.

pub mod audio;
pub mod config;
pub mod messaging;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use audio::backend::{AudioBackend, PlaybackError, SoundId, next_sound_id};
pub use audio::loader::{LoadError, SampleBuffer, load_sample};
pub use audio::parameters::MasterVolume;
pub use audio::sampler::{OutputStream, SamplerBackend};
pub use config::SequencerConfig;
pub use messaging::channels::{ChannelObserver, create_notification_channel};
pub use messaging::notification::Notification;
pub use sequencer::clock::{ClockHandle, ClockState, ObserverGone, TickObserver};
pub use sequencer::engine::BeatEngine;
pub use sequencer::matrix::BeatMatrix;
