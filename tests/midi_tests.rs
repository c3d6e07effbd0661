use crossbeam::channel::unbounded;
use jamlink::event_loop::AppEvent;
use jamlink::midi::{
    note_name, run_midi_input, EventKind, MidiEvent, MockMidiEngine, ValidationError,
};
use std::time::Duration;

#[test]
fn test_status_nibble_classification() {
    let note_on = MidiEvent::from_bytes(&[0x90, 60, 100]).unwrap();
    assert_eq!(note_on.kind(), EventKind::NoteOn);

    let note_off = MidiEvent::from_bytes(&[0x80, 60, 0]).unwrap();
    assert_eq!(note_off.kind(), EventKind::NoteOff);

    let control_change = MidiEvent::from_bytes(&[0xB0, 1, 64]).unwrap();
    assert_eq!(control_change.kind(), EventKind::Other);
}

#[test]
fn test_channel_nibble_is_carried() {
    let event = MidiEvent::from_bytes(&[0x93, 60, 100]).unwrap();
    assert_eq!(event.kind(), EventKind::NoteOn);
    assert_eq!(event.channel(), 3);

    let built = MidiEvent::note_on(3, 60, 100);
    assert_eq!(built.to_bytes(), [0x93, 60, 100]);
}

#[test]
fn test_wrong_length_is_rejected() {
    assert_eq!(
        MidiEvent::from_bytes(&[0x90, 60]),
        Err(ValidationError::WrongLength(2))
    );
    assert_eq!(
        MidiEvent::from_bytes(&[0xF8]),
        Err(ValidationError::WrongLength(1))
    );
    assert_eq!(
        MidiEvent::from_bytes(&[0x90, 60, 100, 0]),
        Err(ValidationError::WrongLength(4))
    );
}

#[test]
fn test_out_of_range_data_bytes_are_rejected() {
    assert_eq!(
        MidiEvent::from_bytes(&[0x90, 128, 100]),
        Err(ValidationError::PitchOutOfRange(128))
    );
    assert_eq!(
        MidiEvent::from_bytes(&[0x90, 60, 200]),
        Err(ValidationError::VelocityOutOfRange(200))
    );
}

#[test]
fn test_zero_velocity_note_on_is_a_release() {
    let silent_on = MidiEvent::note_on(0, 60, 0);
    assert_eq!(silent_on.kind(), EventKind::NoteOn);
    assert!(silent_on.is_release());

    let sounding_on = MidiEvent::note_on(0, 60, 100);
    assert!(!sounding_on.is_release());

    assert!(MidiEvent::note_off(0, 60).is_release());
}

#[test]
fn test_note_names() {
    assert_eq!(note_name(60), "C4");
    assert_eq!(note_name(61), "C#4");
    assert_eq!(note_name(69), "A4");
    assert_eq!(note_name(0), "C-1");
    assert_eq!(note_name(127), "G9");
}

#[test]
fn test_transposition_stays_in_range() {
    let event = MidiEvent::note_on(0, 60, 100);
    let up = event.transposed(7).expect("60 + 7 is a valid pitch");
    assert_eq!(up.pitch, 67);
    assert_eq!(up.velocity, 100, "transposition must not touch velocity");
}

#[test]
fn test_transposition_overflow_is_rejected_not_wrapped() {
    let high = MidiEvent::note_on(0, 125, 100);
    assert_eq!(high.transposed(7), None);

    let low = MidiEvent::note_on(0, 3, 100);
    assert_eq!(low.transposed(-12), None);

    // The boundary itself is still fine
    assert_eq!(MidiEvent::note_on(0, 120, 100).transposed(7).unwrap().pitch, 127);
}

#[test]
fn test_mock_engine_pump_forwards_script_in_order() {
    let engine = MockMidiEngine::with_script(vec![
        MidiEvent::note_on(0, 60, 100),
        MidiEvent::note_off(0, 60),
    ]);
    let (tx, rx) = unbounded();

    let handle = run_midi_input(engine, tx);

    let first = rx
        .recv_timeout(Duration::from_secs(1))
        .expect("first scripted event should arrive");
    match first {
        AppEvent::LocalMidi(timed) => assert_eq!(timed.event, MidiEvent::note_on(0, 60, 100)),
        other => panic!("Expected LocalMidi, got {:?}", other),
    }

    let second = rx
        .recv_timeout(Duration::from_secs(1))
        .expect("second scripted event should arrive");
    match second {
        AppEvent::LocalMidi(timed) => assert_eq!(timed.event, MidiEvent::note_off(0, 60)),
        other => panic!("Expected LocalMidi, got {:?}", other),
    }

    // Script exhausted: the pump thread stops on its own.
    handle.join().expect("input pump thread panicked");
}
