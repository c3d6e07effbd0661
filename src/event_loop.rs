//! The dispatch loop.
//!
//! Every event source (MIDI device, keyboard, remote peer) feeds one
//! queue; the loop drains it in arrival order and runs each handler to
//! completion against the shared session. All note semantics live here:
//! what a note-on does, when a round trip is timed, how the harmonizer
//! replays remote events.

use crate::audio::Sampler;
use crate::keyboard::{self, KeyAction, KEY_VELOCITY};
use crate::midi::{note_name, EventKind, MidiEvent, TimedEvent};
use crate::net::PeerLink;
use crate::session::SharedSession;
use crate::ui::Console;
use crossbeam::channel::Receiver;
use crossterm::event::KeyCode;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Interval added to remote events while the harmonizer is on.
pub const HARMONY_SEMITONES: i16 = 7;

/// One inbound occurrence from any source.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Event from the local MIDI device
    LocalMidi(TimedEvent),
    /// A terminal key went down or up
    Key { code: KeyCode, pressed: bool },
    /// Event from the remote peer
    Remote {
        event: MidiEvent,
        received_at: Instant,
    },
    /// The peer link dropped
    ConnectionLost(String),
    /// Stop dispatching
    Shutdown,
}

pub struct EventLoop<S: Sampler, L: PeerLink> {
    session: SharedSession,
    events: Receiver<AppEvent>,
    sampler: S,
    link: Option<L>,
    console: Console,
    /// MIDI channel stamped onto keyboard-synthesized events
    channel: u8,
}

impl<S: Sampler, L: PeerLink> EventLoop<S, L> {
    pub fn new(
        session: SharedSession,
        events: Receiver<AppEvent>,
        sampler: S,
        link: Option<L>,
        console: Console,
        channel: u8,
    ) -> Self {
        EventLoop {
            session,
            events,
            sampler,
            link,
            console,
            channel,
        }
    }

    /// Dispatches events until shutdown or until every sender is gone.
    pub fn run(&mut self) {
        info!("Dispatch loop running");
        loop {
            match self.events.recv() {
                Ok(AppEvent::LocalMidi(timed)) => {
                    self.handle_local(timed.event, timed.received_at)
                }
                Ok(AppEvent::Key { code, pressed }) => {
                    if self.handle_key(code, pressed) {
                        break;
                    }
                }
                Ok(AppEvent::Remote { event, received_at }) => {
                    self.handle_remote(event, received_at)
                }
                Ok(AppEvent::ConnectionLost(reason)) => {
                    warn!("Peer link lost: {}", reason);
                    self.console.log(&format!("peer link lost: {}", reason));
                    self.link = None;
                }
                Ok(AppEvent::Shutdown) | Err(_) => break,
            }
        }
        info!("Dispatch loop stopped");
    }

    /// A locally originated event: stamp note-ons for latency accounting,
    /// sound it, relay it to the peer.
    fn handle_local(&mut self, event: MidiEvent, received_at: Instant) {
        if event.kind() == EventKind::NoteOn {
            self.session.lock().unwrap().last_note_on_sent = Some(received_at);
        }
        self.apply_note_event(event);
        if let Some(link) = &self.link {
            if let Err(err) = link.send(event) {
                warn!("Could not queue event for peer: {}", err);
            }
        }
    }

    /// An event echoed back from the peer: note-ons are logged and timed;
    /// playback happens only through the harmonizer.
    fn handle_remote(&mut self, event: MidiEvent, received_at: Instant) {
        if event.kind() == EventKind::NoteOn {
            self.console.log(&format!("peer note {}", event.pitch));
            let sample = {
                let mut session = self.session.lock().unwrap();
                let sent = session.last_note_on_sent;
                sent.map(|sent| {
                    session
                        .latency
                        .record_round_trip(sent, received_at)
                        .map(|ms| (ms, session.latency.average().unwrap_or(ms)))
                })
            };
            match sample {
                Some(Ok((ms, average))) => {
                    self.console.log(&format!("peer roundtrip {}ms", ms.ceil()));
                    self.console.set_latency(average);
                }
                Some(Err(err)) => debug!("Skipping round-trip sample: {}", err),
                None => debug!("Peer note-on before any local one, nothing to time"),
            }
        }

        let harmonize = self.session.lock().unwrap().harmonize;
        if harmonize {
            match event.transposed(HARMONY_SEMITONES) {
                Some(harmony) => self.apply_note_event(harmony),
                None => warn!(
                    "Harmony for pitch {} leaves the MIDI range, dropped",
                    event.pitch
                ),
            }
        }
    }

    /// Returns true when the session should end.
    fn handle_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        let octave = self.session.lock().unwrap().octave;
        let action = match keyboard::map_key(code, octave) {
            Some(action) => action,
            None => return false,
        };
        match action {
            KeyAction::Quit if pressed => return true,
            KeyAction::OctaveDown if pressed => self.shift_octave(-1),
            KeyAction::OctaveUp if pressed => self.shift_octave(1),
            KeyAction::ToggleHarmonize if pressed => {
                let harmonize = {
                    let mut session = self.session.lock().unwrap();
                    session.harmonize = !session.harmonize;
                    session.harmonize
                };
                self.console
                    .log(if harmonize { "harmonize on" } else { "harmonize off" });
            }
            KeyAction::Note(pitch) => self.handle_key_note(pitch, pressed),
            _ => {}
        }
        false
    }

    fn shift_octave(&mut self, step: i32) {
        let mut session = self.session.lock().unwrap();
        session.octave += step;
        info!("Octave offset now {}", session.octave);
    }

    /// Synthesizes note events for the keyboard fallback. Key-down fires
    /// only while the pitch is not held, so key repeat stays quiet;
    /// key-up always releases.
    fn handle_key_note(&mut self, pitch: u8, pressed: bool) {
        if pressed && self.session.lock().unwrap().notes.is_held(pitch) {
            return;
        }
        let event = if pressed {
            MidiEvent::note_on(self.channel, pitch, KEY_VELOCITY)
        } else {
            MidiEvent::note_off(self.channel, pitch)
        };
        self.handle_local(event, Instant::now());
    }

    /// Applies note semantics: start a voice on a fresh press, stop it on
    /// release, ignore anything that is not a note event.
    fn apply_note_event(&mut self, event: MidiEvent) {
        match event.kind() {
            EventKind::NoteOn if !event.is_release() => self.press(event.pitch),
            EventKind::NoteOn | EventKind::NoteOff => self.release(event.pitch),
            EventKind::Other => debug!("Ignoring non-note event: {:#04x}", event.status),
        }
    }

    fn press(&mut self, pitch: u8) {
        if self.session.lock().unwrap().notes.is_held(pitch) {
            return;
        }
        let voice = match self.sampler.start_note(pitch) {
            Ok(voice) => Some(voice),
            Err(err) => {
                error!("Could not start voice for {}: {}", note_name(pitch), err);
                None
            }
        };
        self.session.lock().unwrap().notes.press(pitch, voice);
        self.console.log(&note_name(pitch));
    }

    fn release(&mut self, pitch: u8) {
        let held = self.session.lock().unwrap().notes.release(pitch);
        if let Some(held) = held {
            if let Some(voice) = held.voice {
                if let Err(err) = self.sampler.stop_note(voice) {
                    error!("Could not stop voice for {}: {}", note_name(pitch), err);
                }
            }
        }
    }
}
