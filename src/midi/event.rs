use std::error::Error;
use std::fmt;

/// Pitch-class names, C first, matching `pitch % 12`.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Classification of a status byte's message nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    /// Any nibble other than 8 or 9; carried but never acted on
    Other,
}

/// Rejection reason for raw event bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Payload was not exactly 3 bytes
    WrongLength(usize),
    /// Pitch byte above 127
    PitchOutOfRange(u8),
    /// Velocity byte above 127
    VelocityOutOfRange(u8),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::WrongLength(len) => {
                write!(f, "expected 3 event bytes, got {}", len)
            }
            ValidationError::PitchOutOfRange(pitch) => {
                write!(f, "pitch {} outside MIDI range 0-127", pitch)
            }
            ValidationError::VelocityOutOfRange(velocity) => {
                write!(f, "velocity {} outside MIDI range 0-127", velocity)
            }
        }
    }
}

impl Error for ValidationError {}

/// A 3-byte MIDI note event, the unit carried by devices and the wire.
///
/// The upper status nibble is the message kind, the lower one the channel.
/// `pitch` and `velocity` are guaranteed in 0..=127 when the event came
/// through [`MidiEvent::from_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub status: u8,
    pub pitch: u8,
    pub velocity: u8,
}

impl MidiEvent {
    pub fn note_on(channel: u8, pitch: u8, velocity: u8) -> Self {
        MidiEvent {
            status: 0x90 | (channel & 0x0F),
            pitch,
            velocity,
        }
    }

    pub fn note_off(channel: u8, pitch: u8) -> Self {
        MidiEvent {
            status: 0x80 | (channel & 0x0F),
            pitch,
            velocity: 0,
        }
    }

    /// Validating parser for raw device or wire bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ValidationError> {
        if data.len() != 3 {
            return Err(ValidationError::WrongLength(data.len()));
        }
        if data[1] > 127 {
            return Err(ValidationError::PitchOutOfRange(data[1]));
        }
        if data[2] > 127 {
            return Err(ValidationError::VelocityOutOfRange(data[2]));
        }
        Ok(MidiEvent {
            status: data[0],
            pitch: data[1],
            velocity: data[2],
        })
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.status, self.pitch, self.velocity]
    }

    pub fn kind(self) -> EventKind {
        match self.status >> 4 {
            9 => EventKind::NoteOn,
            8 => EventKind::NoteOff,
            _ => EventKind::Other,
        }
    }

    pub fn channel(self) -> u8 {
        self.status & 0x0F
    }

    /// A note-on with velocity 0 releases the note, per MIDI convention.
    pub fn is_release(self) -> bool {
        match self.kind() {
            EventKind::NoteOff => true,
            EventKind::NoteOn => self.velocity == 0,
            EventKind::Other => false,
        }
    }

    /// Shifts the pitch by the given number of semitones.
    ///
    /// Returns None when the result leaves 0..=127; the pitch is never
    /// wrapped or clamped into range.
    pub fn transposed(self, semitones: i16) -> Option<Self> {
        let pitch = i16::from(self.pitch) + semitones;
        if (0..=127).contains(&pitch) {
            Some(MidiEvent {
                pitch: pitch as u8,
                ..self
            })
        } else {
            None
        }
    }
}

/// Display name for a pitch: note name plus octave, e.g. `A4` for 69.
pub fn note_name(pitch: u8) -> String {
    let octave = i32::from(pitch) / 12 - 1;
    format!("{}{}", NOTE_NAMES[usize::from(pitch) % 12], octave)
}
