//! Wire format: every message is exactly 3 bytes, laid out like a MIDI
//! event. Frames are validated on receipt; anything else is dropped.

use std::io::{self, Read, Write};

/// Size in bytes of one wire message.
pub const FRAME_LEN: usize = 3;

/// Reads one frame off the stream. Blocks until all 3 bytes arrive.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<[u8; FRAME_LEN]> {
    let mut buf = [0u8; FRAME_LEN];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn write_frame<W: Write>(writer: &mut W, frame: [u8; FRAME_LEN]) -> io::Result<()> {
    writer.write_all(&frame)
}
