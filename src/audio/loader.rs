// Sample loading - maps WAV files on disk to playable sound handles

use crate::audio::backend::{SoundId, next_sound_id};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("wav read error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported wav layout: {0}")]
    Unsupported(String),
}

/// A decoded clip: mono f32 frames plus the rate they were recorded at.
///
/// Multi-channel files are downmixed by averaging. The sampler plays frames
/// back at the device rate as-is; resampling is left to offline tooling.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    pub frames: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn load_wav(path: &Path) -> Result<Self, LoadError> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<Result<_, _>>()?
            }
        };

        let frames = match spec.channels {
            0 => return Err(LoadError::Unsupported("zero channels".to_string())),
            1 => raw,
            n => downmix(&raw, n as usize),
        };

        Ok(Self {
            frames,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Average interleaved channels down to mono.
fn downmix(raw: &[f32], channels: usize) -> Vec<f32> {
    raw.chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Load a WAV file and allocate a fresh handle for it. The caller registers
/// the pair with a backend; the engine only ever sees the handle.
pub fn load_sample(path: impl AsRef<Path>) -> Result<(SoundId, SampleBuffer), LoadError> {
    let buffer = SampleBuffer::load_wav(path.as_ref())?;
    Ok((next_sound_id(), buffer))
}
