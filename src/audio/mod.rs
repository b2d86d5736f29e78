// Audio domain - collaborator boundary, shared parameters, reference sampler

pub mod backend;
pub mod loader;
pub mod parameters;
pub mod sampler;

pub use backend::{AudioBackend, PlaybackError, SoundId, next_sound_id};
pub use loader::{LoadError, SampleBuffer, load_sample};
pub use parameters::{AtomicF32, MasterVolume};
pub use sampler::{OutputStream, SamplerBackend};
