//! Peer networking for JamLink
//!
//! This module provides the socket bridge to the remote peer, including:
//! - The fixed 3-byte wire format shared with the MIDI event layout
//! - [`PeerLink`] trait with a fire-and-forget outbound queue
//! - [`TcpLink`] for a real peer and [`MockLink`] for tests
//!
mod frame;
mod link;

pub use frame::{read_frame, write_frame, FRAME_LEN};
pub use link::{LinkError, MockLink, PeerLink, TcpLink};
