//! The fixed ping sample and the pitch math that shifts it.

/// Sample rate the ping is rendered at.
pub const PING_SAMPLE_RATE: u32 = 44_100;

/// The ping is an A4 sine burst; voices reach other pitches by rate.
pub const PING_BASE_FREQUENCY: f32 = 440.0;

const PING_SECONDS: f32 = 0.5;
const PING_DECAY: f32 = 6.0;
const PING_LEVEL: f32 = 0.5;

/// Frequency of a MIDI pitch in equal temperament, A4 = 440 Hz.
pub fn pitch_to_frequency(pitch: u8) -> f32 {
    440.0 * 2f32.powf((f32::from(pitch) - 69.0) / 12.0)
}

/// Playback-rate ratio that shifts the ping to the given pitch.
pub fn pitch_ratio(pitch: u8) -> f32 {
    pitch_to_frequency(pitch) / PING_BASE_FREQUENCY
}

/// Renders the short percussive ping every note plays: a sine burst with
/// an exponential decay.
pub fn render_ping() -> Vec<f32> {
    let frames = (PING_SECONDS * PING_SAMPLE_RATE as f32) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f32 / PING_SAMPLE_RATE as f32;
            let envelope = (-PING_DECAY * t).exp();
            (2.0 * std::f32::consts::PI * PING_BASE_FREQUENCY * t).sin() * envelope * PING_LEVEL
        })
        .collect()
}
