use super::engine::{MidiError, MidiInputEngine};
use crate::event_loop::AppEvent;
use crossbeam::channel::Sender;
use log::{debug, error, info};
use std::thread;

/// Forwards device events into the dispatch queue until the engine
/// disconnects. Malformed events are dropped; the thread keeps reading.
pub fn run_midi_input<T>(mut engine: T, events: Sender<AppEvent>) -> thread::JoinHandle<()>
where
    T: MidiInputEngine + 'static,
{
    thread::spawn(move || {
        info!("MIDI input thread started");
        loop {
            match engine.recv() {
                Ok(timed) => {
                    if events.send(AppEvent::LocalMidi(timed)).is_err() {
                        break;
                    }
                }
                Err(MidiError::Validation(err)) => {
                    debug!("Dropped malformed MIDI data: {}", err);
                }
                Err(err) => {
                    error!("MIDI input stopped: {}", err);
                    break;
                }
            }
        }
    })
}
