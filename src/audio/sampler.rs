// Reference sampler backend - preloaded clips mixed into a cpal output stream

use crate::audio::backend::{AudioBackend, PlaybackError, SoundId};
use crate::audio::loader::{LoadError, SampleBuffer, load_sample};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A sounding clip. Each sound has at most one voice, so a retrigger resets
/// the position instead of layering a second copy of the same clip.
struct Voice {
    position: usize,
}

struct ClipSlot {
    buffer: Arc<SampleBuffer>,
    /// Last level set via `set_volume`; persists across plays.
    gain: f32,
    voice: Option<Voice>,
}

#[derive(Default)]
struct Bank {
    clips: HashMap<SoundId, ClipSlot>,
}

/// Sample-playback collaborator backed by preloaded WAV buffers.
///
/// The handle is cheap to clone and safe to share between the UI thread and
/// the clock thread; the output stream itself lives in an [`OutputStream`]
/// guard because cpal streams cannot cross threads on every platform. A sound
/// counts as playing from `play` until the stream has consumed its clip or
/// `stop` is called.
#[derive(Clone)]
pub struct SamplerBackend {
    bank: Arc<Mutex<Bank>>,
}

/// Keeps the cpal stream alive. Hold it where the backend was created
/// (typically the UI thread) and drop it to silence the device.
pub struct OutputStream {
    _stream: cpal::Stream,
}

impl SamplerBackend {
    pub fn new() -> Self {
        Self {
            bank: Arc::new(Mutex::new(Bank::default())),
        }
    }

    /// Put a decoded clip behind `sound`. Replaces any previous clip and
    /// resets its gain to the native level.
    pub fn register(&self, sound: SoundId, buffer: SampleBuffer) {
        self.bank.lock().unwrap().clips.insert(
            sound,
            ClipSlot {
                buffer: Arc::new(buffer),
                gain: 1.0,
                voice: None,
            },
        );
    }

    /// Load a WAV file and register it under a fresh handle.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SoundId, LoadError> {
        let (sound, buffer) = load_sample(path)?;
        self.register(sound, buffer);
        Ok(sound)
    }

    /// Open the default output device and start mixing registered clips
    /// into it.
    pub fn open_output(&self) -> Result<OutputStream, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::Device("no output device".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| PlaybackError::Device(e.to_string()))?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(PlaybackError::Device(format!(
                "unsupported sample format {:?}",
                supported.sample_format()
            )));
        }

        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.into();
        let bank = Arc::clone(&self.bank);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mix_into(&mut bank.lock().unwrap(), data, channels);
                },
                |err| eprintln!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| PlaybackError::Device(e.to_string()))?;
        stream.play().map_err(|e| PlaybackError::Device(e.to_string()))?;

        Ok(OutputStream { _stream: stream })
    }
}

impl Default for SamplerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for SamplerBackend {
    fn play(&self, sound: SoundId) -> Result<(), PlaybackError> {
        let mut bank = self.bank.lock().unwrap();
        let slot = bank
            .clips
            .get_mut(&sound)
            .ok_or(PlaybackError::UnknownSound(sound))?;
        slot.voice = Some(Voice { position: 0 });
        Ok(())
    }

    fn stop(&self, sound: SoundId) {
        if let Some(slot) = self.bank.lock().unwrap().clips.get_mut(&sound) {
            slot.voice = None;
        }
    }

    fn is_playing(&self, sound: SoundId) -> bool {
        self.bank
            .lock()
            .unwrap()
            .clips
            .get(&sound)
            .is_some_and(|slot| slot.voice.is_some())
    }

    fn set_volume(&self, sound: SoundId, level: f32) {
        if let Some(slot) = self.bank.lock().unwrap().clips.get_mut(&sound) {
            slot.gain = level.clamp(0.0, 1.0);
        }
    }
}

/// Mix every active voice into an interleaved output buffer, duplicating the
/// mono frame across channels. Voices that run off the end of their clip are
/// retired.
fn mix_into(bank: &mut Bank, data: &mut [f32], channels: usize) {
    for frame in data.chunks_mut(channels) {
        frame.fill(0.0);
    }

    for slot in bank.clips.values_mut() {
        let Some(voice) = slot.voice.as_mut() else {
            continue;
        };
        let frames = &slot.buffer.frames;

        for frame in data.chunks_mut(channels) {
            if voice.position >= frames.len() {
                break;
            }
            let sample = frames[voice.position] * slot.gain;
            for out in frame.iter_mut() {
                *out += sample;
            }
            voice.position += 1;
        }

        if voice.position >= frames.len() {
            slot.voice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::next_sound_id;

    fn clip(frames: Vec<f32>) -> SampleBuffer {
        SampleBuffer {
            frames,
            sample_rate: 44_100,
        }
    }

    fn mix(backend: &SamplerBackend, out_frames: usize, channels: usize) -> Vec<f32> {
        let mut data = vec![f32::NAN; out_frames * channels];
        mix_into(&mut backend.bank.lock().unwrap(), &mut data, channels);
        data
    }

    #[test]
    fn test_play_unknown_sound_is_an_error() {
        let backend = SamplerBackend::new();
        let sound = next_sound_id();
        assert_eq!(
            backend.play(sound),
            Err(PlaybackError::UnknownSound(sound))
        );
    }

    #[test]
    fn test_play_and_stop_track_voice_state() {
        let backend = SamplerBackend::new();
        let sound = next_sound_id();
        backend.register(sound, clip(vec![1.0, 0.5]));

        assert!(!backend.is_playing(sound));
        backend.play(sound).unwrap();
        assert!(backend.is_playing(sound));
        backend.stop(sound);
        assert!(!backend.is_playing(sound));
    }

    #[test]
    fn test_mixing_advances_and_retires_the_voice() {
        let backend = SamplerBackend::new();
        let sound = next_sound_id();
        backend.register(sound, clip(vec![1.0, 0.5]));
        backend.play(sound).unwrap();

        let data = mix(&backend, 4, 2);
        assert_eq!(data, vec![1.0, 1.0, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0]);
        assert!(!backend.is_playing(sound));
    }

    #[test]
    fn test_retrigger_restarts_from_the_beginning() {
        let backend = SamplerBackend::new();
        let sound = next_sound_id();
        backend.register(sound, clip(vec![1.0, 0.5, 0.25]));
        backend.play(sound).unwrap();

        assert_eq!(mix(&backend, 1, 2), vec![1.0, 1.0]);

        backend.play(sound).unwrap();
        assert_eq!(mix(&backend, 1, 2), vec![1.0, 1.0]);
    }

    #[test]
    fn test_gain_persists_across_plays() {
        let backend = SamplerBackend::new();
        let sound = next_sound_id();
        backend.register(sound, clip(vec![1.0]));

        backend.set_volume(sound, 0.5);
        backend.play(sound).unwrap();
        assert_eq!(mix(&backend, 1, 1), vec![0.5]);

        // No set_volume this time: the last level still applies.
        backend.play(sound).unwrap();
        assert_eq!(mix(&backend, 1, 1), vec![0.5]);
    }

    #[test]
    fn test_distinct_sounds_mix_additively() {
        let backend = SamplerBackend::new();
        let kick = next_sound_id();
        let snare = next_sound_id();
        backend.register(kick, clip(vec![0.25, 0.25]));
        backend.register(snare, clip(vec![0.5]));

        backend.play(kick).unwrap();
        backend.play(snare).unwrap();

        assert_eq!(mix(&backend, 2, 1), vec![0.75, 0.25]);
    }

    #[test]
    fn test_set_volume_on_unknown_sound_is_ignored() {
        let backend = SamplerBackend::new();
        backend.set_volume(next_sound_id(), 0.5);
    }
}
