use super::event::{MidiEvent, ValidationError};
use std::error::Error;
use std::fmt;
use std::time::Instant;

/// Custom error type for MIDI input operations
#[derive(Debug)]
pub enum MidiError {
    /// No usable input port, or platform MIDI support is missing
    DeviceUnavailable(String),
    /// The device delivered bytes that do not form a valid event
    Validation(ValidationError),
    /// The device connection went away
    Disconnected(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::DeviceUnavailable(msg) => write!(f, "MIDI device unavailable: {}", msg),
            MidiError::Validation(err) => write!(f, "invalid MIDI data: {}", err),
            MidiError::Disconnected(msg) => write!(f, "MIDI input disconnected: {}", msg),
        }
    }
}

impl Error for MidiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MidiError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for MidiError {
    fn from(err: ValidationError) -> Self {
        MidiError::Validation(err)
    }
}

/// An event plus the instant it arrived from the device.
#[derive(Debug, Clone, Copy)]
pub struct TimedEvent {
    pub event: MidiEvent,
    pub received_at: Instant,
}

/// Result type for MIDI input operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Trait defining the interface for MIDI input sources
pub trait MidiInputEngine: Send {
    /// Blocks until the next event arrives from the device
    fn recv(&mut self) -> Result<TimedEvent>;

    /// Names of the input ports this engine can see
    fn list_devices(&self) -> Vec<String>;
}
