use super::engine::{MidiError, MidiInputEngine, Result, TimedEvent};
use super::event::MidiEvent;
use midir::{Ignore, MidiInput, MidiInputConnection};
use std::sync::mpsc::{channel, Receiver};
use std::time::Instant;

/// MIDI input via a real device, backed by midir.
///
/// The midir callback runs on the platform's MIDI thread; it forwards raw
/// bytes with a receipt timestamp over a channel that [`MidirEngine::recv`]
/// drains.
pub struct MidirEngine {
    #[allow(dead_code)]
    input: MidiInputConnection<()>,
    rx: Receiver<(Vec<u8>, Instant)>,
    port_name: String,
}

impl MidirEngine {
    /// Connects to the named input port, or the first available one.
    pub fn new(device_name: Option<String>) -> Result<Self> {
        let mut midi_in =
            MidiInput::new("jamlink-in").map_err(|e| MidiError::DeviceUnavailable(e.to_string()))?;
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        if in_ports.is_empty() {
            return Err(MidiError::DeviceUnavailable(
                "no MIDI input ports detected".to_string(),
            ));
        }

        let in_port = match &device_name {
            Some(name) => in_ports
                .iter()
                .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
                .ok_or_else(|| {
                    MidiError::DeviceUnavailable(format!("input device '{}' not found", name))
                })?,
            None => &in_ports[0],
        };
        let port_name = midi_in.port_name(in_port).unwrap_or_default();

        let (tx, rx) = channel();
        let input = midi_in
            .connect(
                in_port,
                "jamlink-input",
                move |_stamp, message, _| {
                    let _ = tx.send((message.to_vec(), Instant::now()));
                },
                (),
            )
            .map_err(|e| MidiError::DeviceUnavailable(e.to_string()))?;

        Ok(MidirEngine {
            input,
            rx,
            port_name,
        })
    }

    /// Name of the port this engine is bound to.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn list_device_names() -> Vec<String> {
        let mut devices = Vec::new();

        if let Ok(midi_in) = MidiInput::new("jamlink-list") {
            for port in midi_in.ports() {
                if let Ok(name) = midi_in.port_name(&port) {
                    devices.push(name);
                }
            }
        }

        devices
    }
}

impl MidiInputEngine for MidirEngine {
    fn recv(&mut self) -> Result<TimedEvent> {
        let (data, received_at) = self
            .rx
            .recv()
            .map_err(|_| MidiError::Disconnected("input callback channel closed".to_string()))?;
        let event = MidiEvent::from_bytes(&data)?;
        Ok(TimedEvent { event, received_at })
    }

    fn list_devices(&self) -> Vec<String> {
        Self::list_device_names()
    }
}
