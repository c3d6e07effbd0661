extern crate jamlink;

use crossbeam::channel::{unbounded, Sender};
use crossterm::event::KeyCode;
use jamlink::audio::MockSampler;
use jamlink::event_loop::{AppEvent, EventLoop};
use jamlink::midi::{MidiEvent, TimedEvent};
use jamlink::net::MockLink;
use jamlink::session::{create_shared_session, SharedSession};
use jamlink::ui::Console;
use std::time::{Duration, Instant};

struct Harness {
    session: SharedSession,
    sampler: MockSampler,
    link: MockLink,
    events: Sender<AppEvent>,
    event_loop: EventLoop<MockSampler, MockLink>,
}

/// Builds a loop wired to mocks. Tests queue events, drop the sender and
/// run the loop to completion on this thread, so dispatch order is exactly
/// queue order.
fn harness(harmonize: bool) -> Harness {
    let session = create_shared_session(harmonize);
    let sampler = MockSampler::new();
    let link = MockLink::new();
    let (events, event_rx) = unbounded();
    let event_loop = EventLoop::new(
        session.clone(),
        event_rx,
        sampler.clone(),
        Some(link.clone()),
        Console::hidden(),
        0,
    );
    Harness {
        session,
        sampler,
        link,
        events,
        event_loop,
    }
}

fn local(event: MidiEvent) -> AppEvent {
    AppEvent::LocalMidi(TimedEvent {
        event,
        received_at: Instant::now(),
    })
}

fn key(code: char, pressed: bool) -> AppEvent {
    AppEvent::Key {
        code: KeyCode::Char(code),
        pressed,
    }
}

#[test]
fn test_local_note_on_plays_and_relays() {
    let mut h = harness(false);

    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.sampler.started().len(), 1);
    assert_eq!(h.sampler.started()[0].1, 60);
    assert_eq!(h.link.sent(), vec![MidiEvent::note_on(0, 60, 100)]);
    assert_eq!(h.session.lock().unwrap().notes.held_pitches(), vec![60]);
    assert!(
        h.session.lock().unwrap().last_note_on_sent.is_some(),
        "local note-on must stamp the round-trip clock"
    );
}

#[test]
fn test_note_off_restores_the_set_and_stops_the_voice() {
    let mut h = harness(false);

    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    h.events.send(local(MidiEvent::note_off(0, 60))).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(h.session.lock().unwrap().notes.is_empty());
    assert_eq!(h.sampler.started().len(), 1);
    assert_eq!(h.sampler.stopped().len(), 1);
    assert_eq!(h.sampler.started()[0].0, h.sampler.stopped()[0]);
    // Both sides of the gesture are relayed
    assert_eq!(h.link.sent().len(), 2);
}

#[test]
fn test_duplicate_note_on_is_idempotent_while_held() {
    let mut h = harness(false);

    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    h.events.send(local(MidiEvent::note_on(0, 60, 90))).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.session.lock().unwrap().notes.held_pitches(), vec![60]);
    assert_eq!(
        h.sampler.started().len(),
        1,
        "second note-on for a held pitch must not start another voice"
    );
}

#[test]
fn test_zero_velocity_note_on_acts_as_note_off() {
    let mut h = harness(false);

    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    h.events.send(local(MidiEvent::note_on(0, 60, 0))).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(h.session.lock().unwrap().notes.is_empty());
    assert_eq!(h.sampler.stopped().len(), 1);
}

#[test]
fn test_non_note_events_are_ignored() {
    let mut h = harness(false);

    h.events
        .send(local(MidiEvent::from_bytes(&[0xB0, 1, 64]).unwrap()))
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(h.sampler.started().is_empty());
    assert!(h.session.lock().unwrap().notes.is_empty());
    // Still relayed: the peer applies its own note semantics
    assert_eq!(h.link.sent().len(), 1);
}

#[test]
fn test_remote_note_on_echo_records_round_trip() {
    let mut h = harness(false);

    let sent_at = Instant::now();
    h.events
        .send(AppEvent::LocalMidi(TimedEvent {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: sent_at,
        }))
        .unwrap();
    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: sent_at + Duration::from_millis(50),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    let session = h.session.lock().unwrap();
    assert_eq!(session.latency.sample_count(), 1);
    let average = session.latency.average().expect("one echo recorded");
    assert!(
        (average - 50.0).abs() < 1e-6,
        "Expected a 50ms round trip, got {}",
        average
    );
}

#[test]
fn test_remote_note_off_is_not_timed() {
    let mut h = harness(false);

    let sent_at = Instant::now();
    h.events
        .send(AppEvent::LocalMidi(TimedEvent {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: sent_at,
        }))
        .unwrap();
    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_off(0, 60),
            received_at: sent_at + Duration::from_millis(50),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.session.lock().unwrap().latency.sample_count(), 0);
}

#[test]
fn test_remote_echo_before_any_local_note_is_not_timed() {
    let mut h = harness(false);

    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: Instant::now(),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.session.lock().unwrap().latency.sample_count(), 0);
}

#[test]
fn test_remote_events_stay_silent_without_harmonizer() {
    let mut h = harness(false);

    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: Instant::now(),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(h.sampler.started().is_empty());
    assert!(h.link.sent().is_empty(), "remote events are never relayed back");
}

#[test]
fn test_harmonizer_replays_remote_events_a_fifth_up() {
    let mut h = harness(true);

    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: Instant::now(),
        })
        .unwrap();
    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_off(0, 60),
            received_at: Instant::now(),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.sampler.started().len(), 1);
    assert_eq!(h.sampler.started()[0].1, 67, "harmony plays a perfect fifth up");
    assert_eq!(h.sampler.stopped().len(), 1);
    assert!(h.session.lock().unwrap().notes.is_empty());
    assert!(h.link.sent().is_empty(), "harmony voices are local only");
}

#[test]
fn test_harmonizer_rejects_overflowing_pitches() {
    let mut h = harness(true);

    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 125, 100),
            received_at: Instant::now(),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(
        h.sampler.started().is_empty(),
        "125 + 7 leaves the MIDI range and must be dropped"
    );
    assert!(h.session.lock().unwrap().notes.is_empty());
}

#[test]
fn test_harmonize_toggle_key() {
    let mut h = harness(false);

    h.events.send(key('e', true)).unwrap();
    h.events
        .send(AppEvent::Remote {
            event: MidiEvent::note_on(0, 60, 100),
            received_at: Instant::now(),
        })
        .unwrap();
    drop(h.events);
    h.event_loop.run();

    assert!(h.session.lock().unwrap().harmonize);
    assert_eq!(h.sampler.started().len(), 1);
    assert_eq!(h.sampler.started()[0].1, 67);
}

#[test]
fn test_keyboard_note_key_synthesizes_events() {
    let mut h = harness(false);

    // 'q' maps to pitch 56; a repeat press while held stays quiet
    h.events.send(key('q', true)).unwrap();
    h.events.send(key('q', true)).unwrap();
    h.events.send(key('q', false)).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(
        h.link.sent(),
        vec![MidiEvent::note_on(0, 56, 127), MidiEvent::note_off(0, 56)]
    );
    assert!(h.session.lock().unwrap().notes.is_empty());
    assert_eq!(h.sampler.started().len(), 1);
    assert_eq!(h.sampler.stopped().len(), 1);
}

#[test]
fn test_octave_keys_shift_keyboard_pitches() {
    let mut h = harness(false);

    h.events.send(key('x', true)).unwrap();
    h.events.send(key('x', false)).unwrap();
    h.events.send(key('q', true)).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(h.session.lock().unwrap().octave, 1);
    assert_eq!(h.link.sent(), vec![MidiEvent::note_on(0, 56 + 12, 127)]);
}

#[test]
fn test_quit_key_ends_the_loop_with_events_pending() {
    let mut h = harness(false);

    h.events
        .send(AppEvent::Key {
            code: KeyCode::Esc,
            pressed: true,
        })
        .unwrap();
    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    // Sender stays alive; run() must return on the quit key alone.
    h.event_loop.run();

    assert!(
        h.sampler.started().is_empty(),
        "events after quit must not be dispatched"
    );
}

#[test]
fn test_connection_lost_stops_relaying() {
    let mut h = harness(false);

    h.events.send(local(MidiEvent::note_on(0, 60, 100))).unwrap();
    h.events
        .send(AppEvent::ConnectionLost("peer went away".to_string()))
        .unwrap();
    h.events.send(local(MidiEvent::note_on(0, 62, 100))).unwrap();
    drop(h.events);
    h.event_loop.run();

    assert_eq!(
        h.link.sent(),
        vec![MidiEvent::note_on(0, 60, 100)],
        "events after the link drops stay local"
    );
    // Local playback still works without the peer
    assert_eq!(h.sampler.started().len(), 2);
}
