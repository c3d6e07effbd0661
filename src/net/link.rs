use super::frame;
use crate::event_loop::AppEvent;
use crate::midi::MidiEvent;
use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{error, info, warn};
use std::error::Error;
use std::fmt;
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

/// Custom error type for the peer link
#[derive(Debug)]
pub enum LinkError {
    /// Establishing the connection failed
    Connect(String),
    /// The link is down; the event was not queued
    Closed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Connect(msg) => write!(f, "peer connection failed: {}", msg),
            LinkError::Closed => write!(f, "peer link closed"),
        }
    }
}

impl Error for LinkError {}

/// Capability interface for relaying note events to the remote peer.
///
/// Sends are fire-and-forget: they enqueue onto the outbound queue and
/// return. Delivery failures surface later as
/// [`AppEvent::ConnectionLost`].
pub trait PeerLink {
    fn send(&self, event: MidiEvent) -> Result<(), LinkError>;
}

/// TCP link to one remote peer.
///
/// A reader thread turns inbound frames into [`AppEvent::Remote`] entries
/// on the dispatch queue; a writer thread drains the outbound queue.
pub struct TcpLink {
    outbound: Sender<MidiEvent>,
    peer_addr: String,
}

impl TcpLink {
    /// Connects out to a peer.
    pub fn connect(addr: &str, events: Sender<AppEvent>) -> Result<TcpLink, LinkError> {
        let stream = TcpStream::connect(addr).map_err(|e| LinkError::Connect(e.to_string()))?;
        Self::from_stream(stream, events)
    }

    /// Waits for one inbound peer on the given address.
    pub fn accept(addr: &str, events: Sender<AppEvent>) -> Result<TcpLink, LinkError> {
        let listener = TcpListener::bind(addr).map_err(|e| LinkError::Connect(e.to_string()))?;
        info!("Waiting for a peer on {}", addr);
        let (stream, peer) = listener
            .accept()
            .map_err(|e| LinkError::Connect(e.to_string()))?;
        info!("Peer connected from {}", peer);
        Self::from_stream(stream, events)
    }

    /// Wraps an already established connection.
    pub fn from_stream(stream: TcpStream, events: Sender<AppEvent>) -> Result<TcpLink, LinkError> {
        // Note events are tiny and latency matters more than throughput.
        let _ = stream.set_nodelay(true);
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let reader = stream
            .try_clone()
            .map_err(|e| LinkError::Connect(e.to_string()))?;

        let (outbound, outbound_rx) = unbounded::<MidiEvent>();

        let reader_events = events.clone();
        let _ = thread::spawn(move || run_reader(reader, reader_events));
        let _ = thread::spawn(move || run_writer(stream, outbound_rx, events));

        Ok(TcpLink {
            outbound,
            peer_addr,
        })
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl PeerLink for TcpLink {
    fn send(&self, event: MidiEvent) -> Result<(), LinkError> {
        self.outbound.send(event).map_err(|_| LinkError::Closed)
    }
}

fn run_reader(mut stream: TcpStream, events: Sender<AppEvent>) {
    loop {
        match frame::read_frame(&mut stream) {
            Ok(bytes) => match MidiEvent::from_bytes(&bytes) {
                Ok(event) => {
                    let sent = events.send(AppEvent::Remote {
                        event,
                        received_at: Instant::now(),
                    });
                    if sent.is_err() {
                        break;
                    }
                }
                Err(err) => warn!("Dropped malformed frame from peer: {}", err),
            },
            Err(err) => {
                let _ = events.send(AppEvent::ConnectionLost(err.to_string()));
                break;
            }
        }
    }
}

fn run_writer(mut stream: TcpStream, outbound: Receiver<MidiEvent>, events: Sender<AppEvent>) {
    for event in outbound.iter() {
        if let Err(err) = frame::write_frame(&mut stream, event.to_bytes()) {
            error!("Send to peer failed: {}", err);
            let _ = events.send(AppEvent::ConnectionLost(err.to_string()));
            break;
        }
    }
}

/// Mock link recording every transmitted event, for tests. Clones share
/// one record.
#[derive(Debug, Clone, Default)]
pub struct MockLink {
    sent: Arc<Mutex<Vec<MidiEvent>>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events queued for the peer so far, in call order.
    pub fn sent(&self) -> Vec<MidiEvent> {
        self.sent.lock().unwrap().clone()
    }
}

impl PeerLink for MockLink {
    fn send(&self, event: MidiEvent) -> Result<(), LinkError> {
        self.sent.lock().unwrap().push(event);
        Ok(())
    }
}
