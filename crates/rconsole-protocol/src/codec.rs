//! Encoding and decoding of RCON frames.
//!
//! A frame on the wire looks like this (all integers little-endian):
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬──────┬──────┐
//! │ size i32 │ id i32   │ type i32 │ body (UTF-8) │ 0x00 │ 0x00 │
//! └──────────┴──────────┴──────────┴──────────────┴──────┴──────┘
//!             └──────────────────── size bytes ─────────────────┘
//! ```
//!
//! [`encode`] produces the whole frame including the size prefix. Reading is
//! split in two so the transport can pull exactly one frame off a stream:
//! [`frame_len`] validates the 4-byte prefix, then [`decode`] parses the
//! `size` bytes that follow.

use crate::{Packet, ProtocolError};

/// Bytes taken by the little-endian size prefix.
pub const SIZE_PREFIX_BYTES: usize = 4;

/// id + type + body terminator + padding terminator, with an empty body.
pub const MIN_FRAME_BYTES: usize = 10;

/// Largest body a server sends in a single response packet.
const MAX_RESPONSE_BODY_BYTES: usize = 4096;

/// Largest frame (excluding the size prefix) accepted from a server.
pub const MAX_FRAME_BYTES: usize = MIN_FRAME_BYTES + MAX_RESPONSE_BODY_BYTES;

/// Largest body a Minecraft server accepts in a client packet.
pub const MAX_COMMAND_BYTES: usize = 1446;

/// Serializes a packet into a complete frame, size prefix included.
///
/// # Errors
/// - [`ProtocolError::BodyTooLong`] if the body exceeds
///   [`MAX_COMMAND_BYTES`].
/// - [`ProtocolError::EmbeddedNul`] if the body contains a NUL byte.
pub fn encode(packet: &Packet) -> Result<Vec<u8>, ProtocolError> {
    let body = packet.body.as_bytes();
    if body.len() > MAX_COMMAND_BYTES {
        return Err(ProtocolError::BodyTooLong {
            len: body.len(),
            max: MAX_COMMAND_BYTES,
        });
    }
    if body.contains(&0) {
        return Err(ProtocolError::EmbeddedNul);
    }

    let size = MIN_FRAME_BYTES + body.len();
    let mut frame = Vec::with_capacity(SIZE_PREFIX_BYTES + size);
    // `size` is bounded by MAX_COMMAND_BYTES above, so it fits in an i32.
    frame.extend_from_slice(&(size as i32).to_le_bytes());
    frame.extend_from_slice(&packet.id.to_le_bytes());
    frame.extend_from_slice(&packet.kind.to_le_bytes());
    frame.extend_from_slice(body);
    frame.extend_from_slice(&[0, 0]);
    Ok(frame)
}

/// Validates a size prefix and returns how many bytes follow it.
///
/// # Errors
/// [`ProtocolError::FrameTooShort`] or [`ProtocolError::FrameTooLarge`]
/// when the declared size is outside `MIN_FRAME_BYTES..=MAX_FRAME_BYTES`.
pub fn frame_len(prefix: [u8; SIZE_PREFIX_BYTES]) -> Result<usize, ProtocolError> {
    let size = i32::from_le_bytes(prefix);
    if size < MIN_FRAME_BYTES as i32 {
        return Err(ProtocolError::FrameTooShort(size.max(0) as usize));
    }
    let size = size as usize;
    if size > MAX_FRAME_BYTES {
        return Err(ProtocolError::FrameTooLarge(size));
    }
    Ok(size)
}

/// Parses the bytes that follow a size prefix into a [`Packet`].
///
/// # Errors
/// Fails if the frame is shorter than [`MIN_FRAME_BYTES`], larger than
/// [`MAX_FRAME_BYTES`], does not end in two NUL bytes, or carries a body
/// that is not UTF-8.
pub fn decode(frame: &[u8]) -> Result<Packet, ProtocolError> {
    if frame.len() < MIN_FRAME_BYTES {
        return Err(ProtocolError::FrameTooShort(frame.len()));
    }
    if frame.len() > MAX_FRAME_BYTES {
        return Err(ProtocolError::FrameTooLarge(frame.len()));
    }

    let (header, rest) = frame.split_at(8);
    let (body, terminators) = rest.split_at(rest.len() - 2);
    if terminators != [0, 0] {
        return Err(ProtocolError::MissingTerminator);
    }

    let id = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let kind = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let body = String::from_utf8(body.to_vec())?;

    Ok(Packet { id, kind, body })
}
