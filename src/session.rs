//! Session-scoped mutable state.
//!
//! Everything the event handlers mutate lives in one [`Session`] object:
//! the active note set, the octave offset for keyboard notes, the
//! harmonizer toggle, the latency accumulator and the send stamp of the
//! most recent local note-on.

use crate::audio::VoiceId;
use crate::latency::LatencyStats;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// A pitch currently sounding, with the playback voice it started.
///
/// `voice` is None when the sampler could not start playback; the pitch is
/// still tracked so the on/off bookkeeping and the peer relay stay correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldNote {
    pub pitch: u8,
    pub voice: Option<VoiceId>,
}

/// Ordered set of currently held pitches.
///
/// Invariant: a pitch is present iff a note-on without a matching note-off
/// has been processed. Duplicate presses are rejected while held.
#[derive(Debug, Default)]
pub struct NoteTracker {
    held: Vec<HeldNote>,
}

impl NoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, pitch: u8) -> bool {
        self.held.iter().any(|n| n.pitch == pitch)
    }

    /// Records a newly sounding pitch. Returns false if already held.
    pub fn press(&mut self, pitch: u8, voice: Option<VoiceId>) -> bool {
        if self.is_held(pitch) {
            return false;
        }
        self.held.push(HeldNote { pitch, voice });
        true
    }

    /// Removes a pitch, yielding the note to stop. None if not held.
    pub fn release(&mut self, pitch: u8) -> Option<HeldNote> {
        let position = self.held.iter().position(|n| n.pitch == pitch)?;
        Some(self.held.remove(position))
    }

    pub fn held_pitches(&self) -> Vec<u8> {
        self.held.iter().map(|n| n.pitch).collect()
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// All mutable state scoped to one jam session.
pub struct Session {
    pub notes: NoteTracker,
    pub latency: LatencyStats,
    /// Octave steps applied to keyboard-originated pitches
    pub octave: i32,
    /// When on, remote events are replayed locally a fifth up
    pub harmonize: bool,
    /// Send instant of the most recent locally originated note-on
    pub last_note_on_sent: Option<Instant>,
}

impl Session {
    pub fn new(harmonize: bool) -> Self {
        Session {
            notes: NoteTracker::new(),
            latency: LatencyStats::new(),
            octave: 0,
            harmonize,
            last_note_on_sent: None,
        }
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

pub fn create_shared_session(harmonize: bool) -> SharedSession {
    Arc::new(Mutex::new(Session::new(harmonize)))
}
