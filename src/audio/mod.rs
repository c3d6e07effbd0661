//! Audio playback for JamLink
//!
//! This module provides the playback side of the bridge, including:
//! - The [`Sampler`] capability trait the dispatch loop plays notes through
//! - A cpal-backed implementation mixing pitch-shifted copies of one fixed
//!   ping sample
//! - Mock and null implementations for tests and audio-less sessions
//!
mod cpal_backend;
mod ping;
mod sampler;

pub use cpal_backend::CpalSampler;
pub use ping::{pitch_ratio, pitch_to_frequency, render_ping, PING_SAMPLE_RATE};
pub use sampler::{AudioError, MockSampler, NullSampler, Result, Sampler, VoiceId};
