//! MIDI functionality for JamLink
//!
//! This module provides the note-event model and input plumbing, including:
//! - The 3-byte [`MidiEvent`] with validating parsing and classification
//! - Error handling for device and data failures
//! - Real MIDI device input via midir
//! - Mock implementations for testing
//!
//! The main components are:
//! - [`MidiInputEngine`] trait for receiving timestamped events
//! - [`MidirEngine`] for real MIDI device input
//! - [`MockMidiEngine`] for testing
//! - [`run_midi_input`] pump feeding the dispatch queue
//!
mod engine;
mod event;
mod input;
pub mod midir_engine;
pub mod mock_engine;

// Re-export the event model
pub use event::{note_name, EventKind, MidiEvent, ValidationError, NOTE_NAMES};

// Re-export main types from engine
pub use engine::{MidiError, MidiInputEngine, Result, TimedEvent};

// Re-export concrete implementations
pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;

// Re-export the input pump
pub use input::run_midi_input;
