use super::ping::{pitch_ratio, render_ping, PING_SAMPLE_RATE};
use super::sampler::{AudioError, Result, Sampler, VoiceId};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use std::sync::{Arc, Mutex};

const RELEASE_SECONDS: f32 = 0.1;

struct Voice {
    id: VoiceId,
    /// Read-head step through the ping buffer, in ping frames per step
    step: f32,
    /// Fractional read head into the ping buffer
    position: f32,
    gain: f32,
    /// Gain lost per output frame once the voice is released
    fade_per_frame: Option<f32>,
}

struct MixerState {
    ping: Vec<f32>,
    voices: Vec<Voice>,
}

impl MixerState {
    /// Mixes all live voices into the interleaved output buffer. Voices
    /// that ran off the sample or faded out are dropped.
    fn render(&mut self, data: &mut [f32], channels: usize) {
        let MixerState { ping, voices } = self;
        for frame in data.chunks_mut(channels) {
            let mut mixed = 0.0f32;
            voices.retain_mut(|voice| {
                let index = voice.position as usize;
                if index + 1 >= ping.len() || voice.gain <= 0.0 {
                    return false;
                }
                let frac = voice.position - index as f32;
                let sample = ping[index] + (ping[index + 1] - ping[index]) * frac;
                mixed += sample * voice.gain;
                voice.position += voice.step;
                if let Some(fade) = voice.fade_per_frame {
                    voice.gain -= fade;
                }
                true
            });
            for out in frame.iter_mut() {
                *out = mixed;
            }
        }
    }
}

/// Sampler backed by a cpal output stream.
///
/// All voices read the same fixed ping buffer, each at the rate that
/// shifts A440 to its pitch. Released voices ramp to silence over a short
/// window instead of cutting dead.
pub struct CpalSampler {
    state: Arc<Mutex<MixerState>>,
    next_voice: u64,
    /// Ping frames advanced per output frame at ratio 1.0
    rate_step: f32,
    release_frames: f32,
    #[allow(dead_code)]
    stream: cpal::Stream,
}

impl CpalSampler {
    /// Opens the default output device and starts the mixing stream.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            AudioError::DeviceUnavailable("no default output device available".to_string())
        })?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        let state = Arc::new(Mutex::new(MixerState {
            ping: render_ping(),
            voices: Vec::new(),
        }));

        let state_clone = state.clone();
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let mut state = state_clone.lock().unwrap();
                    state.render(data, channels);
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::DeviceUnavailable(e.to_string()))?;
        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        info!("Audio output running at {} Hz", sample_rate);

        Ok(CpalSampler {
            state,
            next_voice: 0,
            rate_step: PING_SAMPLE_RATE as f32 / sample_rate as f32,
            release_frames: RELEASE_SECONDS * sample_rate as f32,
            stream,
        })
    }
}

impl Sampler for CpalSampler {
    fn start_note(&mut self, pitch: u8) -> Result<VoiceId> {
        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        self.state.lock().unwrap().voices.push(Voice {
            id: voice,
            step: pitch_ratio(pitch) * self.rate_step,
            position: 0.0,
            gain: 1.0,
            fade_per_frame: None,
        });
        Ok(voice)
    }

    fn stop_note(&mut self, voice: VoiceId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        // A voice that already played out is gone from the mixer; stopping
        // it again is not an error.
        if let Some(v) = state.voices.iter_mut().find(|v| v.id == voice) {
            v.fade_per_frame = Some(1.0 / self.release_frames);
        }
        Ok(())
    }
}
