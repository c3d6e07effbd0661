use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Handle to one started playback instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceId(pub u64);

/// Custom error type for playback operations
#[derive(Debug)]
pub enum AudioError {
    /// No output device, or the platform audio host rejected the stream
    DeviceUnavailable(String),
    /// The backend refused to start or stop a voice
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::DeviceUnavailable(msg) => {
                write!(f, "audio output unavailable: {}", msg)
            }
            AudioError::Playback(msg) => write!(f, "audio playback error: {}", msg),
        }
    }
}

impl Error for AudioError {}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Capability interface the dispatch loop plays notes through.
///
/// Implementations pitch-shift one short fixed sample per voice;
/// `stop_note` releases with a quick fade rather than cutting dead.
pub trait Sampler {
    fn start_note(&mut self, pitch: u8) -> Result<VoiceId>;
    fn stop_note(&mut self, voice: VoiceId) -> Result<()>;
}

/// No-op sampler used when audio output is unavailable.
#[derive(Debug, Default)]
pub struct NullSampler {
    next_voice: u64,
}

impl NullSampler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sampler for NullSampler {
    fn start_note(&mut self, _pitch: u8) -> Result<VoiceId> {
        let voice = VoiceId(self.next_voice);
        self.next_voice += 1;
        Ok(voice)
    }

    fn stop_note(&mut self, _voice: VoiceId) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MockCalls {
    next_voice: u64,
    started: Vec<(VoiceId, u8)>,
    stopped: Vec<VoiceId>,
}

/// Mock sampler recording every call, for tests. Clones share one record.
#[derive(Debug, Clone, Default)]
pub struct MockSampler {
    calls: Arc<Mutex<MockCalls>>,
}

impl MockSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pitches started so far, in call order.
    pub fn started(&self) -> Vec<(VoiceId, u8)> {
        self.calls.lock().unwrap().started.clone()
    }

    /// Voices stopped so far, in call order.
    pub fn stopped(&self) -> Vec<VoiceId> {
        self.calls.lock().unwrap().stopped.clone()
    }

    /// Voices started but not yet stopped.
    pub fn active_voices(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.started.len() - calls.stopped.len()
    }
}

impl Sampler for MockSampler {
    fn start_note(&mut self, pitch: u8) -> Result<VoiceId> {
        let mut calls = self.calls.lock().unwrap();
        let voice = VoiceId(calls.next_voice);
        calls.next_voice += 1;
        calls.started.push((voice, pitch));
        Ok(voice)
    }

    fn stop_note(&mut self, voice: VoiceId) -> Result<()> {
        self.calls.lock().unwrap().stopped.push(voice);
        Ok(())
    }
}
