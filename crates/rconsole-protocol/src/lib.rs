//! Wire protocol for rconsole.
//!
//! This crate defines the "language" the client speaks to a game server's
//! remote console:
//!
//! - **Packets** ([`Packet`], [`PacketKind`]): the Source RCON frames that
//!   travel over TCP.
//! - **Codec** ([`encode`], [`decode`]): how packets are turned into bytes
//!   and back.
//! - **Commands** ([`Command`] and its typed arguments): the text that goes
//!   inside an `ExecCommand` packet, built from validated input so operator
//!   supplied values can never splice extra syntax into the console line.
//! - **Errors** ([`ProtocolError`], [`ArgumentError`]).
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sockets or sessions. It only
//! knows how to build commands and how to frame them.
//!
//! ```text
//! Session (lifecycle) → Transport (socket) → Protocol (bytes)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod command;
mod error;
mod packet;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{
    decode, encode, frame_len, MAX_COMMAND_BYTES, MAX_FRAME_BYTES,
    MIN_FRAME_BYTES, SIZE_PREFIX_BYTES,
};
pub use command::{Command, GameMode, TimeSetting, Weather, WhitelistAction, WhitelistVerb};
pub use error::{ArgumentError, ProtocolError};
pub use packet::{Packet, PacketKind, AUTH_FAILED_ID};
