use super::engine::{MidiError, MidiInputEngine, Result, TimedEvent};
use super::event::MidiEvent;
use std::collections::VecDeque;
use std::time::Instant;

/// Mock input engine that replays a scripted event sequence, for tests.
pub struct MockMidiEngine {
    script: VecDeque<MidiEvent>,
}

impl MockMidiEngine {
    pub fn new(_device_name: Option<String>) -> Result<Self> {
        Ok(MockMidiEngine {
            script: VecDeque::new(),
        })
    }

    pub fn with_script(events: Vec<MidiEvent>) -> Self {
        MockMidiEngine {
            script: events.into(),
        }
    }

    pub fn list_device_names() -> Vec<String> {
        vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()]
    }
}

impl MidiInputEngine for MockMidiEngine {
    fn recv(&mut self) -> Result<TimedEvent> {
        match self.script.pop_front() {
            Some(event) => Ok(TimedEvent {
                event,
                received_at: Instant::now(),
            }),
            None => Err(MidiError::Disconnected("mock script exhausted".to_string())),
        }
    }

    fn list_devices(&self) -> Vec<String> {
        Self::list_device_names()
    }
}
