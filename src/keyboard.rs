//! Keyboard-to-MIDI fallback.
//!
//! Twenty keys in piano layout cover pitches 56..=75, shifted by the
//! session's octave offset. Two more keys move the octave, one toggles
//! the harmonizer, Esc ends the session. The mapping itself is pure; the
//! reader thread at the bottom feeds raw key transitions into the
//! dispatch queue.

use crate::event_loop::AppEvent;
use crossbeam::channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{error, info};
use std::thread;

/// Note keys, lowest pitch first. Index plus [`BASE_PITCH`] is the
/// unshifted pitch, so `q` sits a major third below middle C.
pub const KEY_TABLE: [char; 20] = [
    'q', 'a', 'w', 's', 'd', 'r', 'f', 't', 'g', 'h', 'u', 'j', 'i', 'k', 'o', 'l', ';', '[',
    '\'', ']',
];

/// Pitch of the first key in the table.
pub const BASE_PITCH: u8 = 56;

/// Velocity used for keyboard-synthesized note-ons.
pub const KEY_VELOCITY: u8 = 127;

/// What a key transition asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Play or release the pitch mapped to a note key
    Note(u8),
    OctaveDown,
    OctaveUp,
    ToggleHarmonize,
    Quit,
}

/// Maps a key to its session action at the given octave offset.
///
/// Returns None for unmapped keys and for note keys the octave shift
/// pushes above the MIDI range.
pub fn map_key(code: KeyCode, octave: i32) -> Option<KeyAction> {
    match code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('z') => Some(KeyAction::OctaveDown),
        KeyCode::Char('x') => Some(KeyAction::OctaveUp),
        KeyCode::Char('e') => Some(KeyAction::ToggleHarmonize),
        KeyCode::Char(c) => key_to_pitch(c, octave).map(KeyAction::Note),
        _ => None,
    }
}

/// Pitch for a note key at the given octave offset. The shifted pitch is
/// floored at 0 and rejected above 127.
pub fn key_to_pitch(key: char, octave: i32) -> Option<u8> {
    let index = KEY_TABLE.iter().position(|&k| k == key)?;
    let pitch = (i32::from(BASE_PITCH) + index as i32 + octave * 12).max(0);
    u8::try_from(pitch).ok().filter(|p| *p <= 127)
}

/// Reads terminal key events and forwards press/release transitions to
/// the dispatch queue. Ctrl+C becomes a shutdown event since raw mode
/// swallows the signal.
pub fn run_keyboard_input(events: Sender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        info!("Keyboard input thread started");
        loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    let pressed = match key.kind {
                        KeyEventKind::Press => true,
                        KeyEventKind::Release => false,
                        KeyEventKind::Repeat => continue,
                    };
                    let ctrl_c = pressed
                        && key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    let message = if ctrl_c {
                        AppEvent::Shutdown
                    } else {
                        AppEvent::Key {
                            code: key.code,
                            pressed,
                        }
                    };
                    if events.send(message).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    error!("Keyboard input stopped: {}", err);
                    break;
                }
            }
        }
    })
}
