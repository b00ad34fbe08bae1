//! RCON packet types.
//!
//! Every message on an RCON connection is one packet: a request id chosen by
//! the client, a numeric type, and a text body. The server echoes the
//! request id back in its reply so the client can pair them up.

use std::fmt;

use crate::Command;

/// Request id a server sends back in an auth response to reject the
/// password.
pub const AUTH_FAILED_ID: i32 = -1;

// ---------------------------------------------------------------------------
// PacketKind
// ---------------------------------------------------------------------------

/// The packet types of the Source RCON protocol.
///
/// The protocol reuses the value `2` for two different meanings depending on
/// direction: client → server it is `ExecCommand`, server → client it is
/// `AuthResponse`. That is why [`Packet`] stores the raw `i32` and the
/// predicates on `Packet` interpret it from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    /// Client → server: log in with the shared secret.
    Auth,
    /// Server → client: result of an `Auth` request.
    AuthResponse,
    /// Client → server: run a console command.
    ExecCommand,
    /// Server → client: output of a command.
    ResponseValue,
}

impl PacketKind {
    /// Returns the numeric value written on the wire.
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Auth => 3,
            Self::AuthResponse | Self::ExecCommand => 2,
            Self::ResponseValue => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// One RCON packet.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Client-chosen request id, echoed by the server.
    pub id: i32,
    /// Raw packet type (see [`PacketKind::to_wire`]).
    pub kind: i32,
    /// Text payload: the password, a command, or command output.
    pub body: String,
}

impl Packet {
    /// Builds a login packet carrying the shared secret.
    pub fn auth(id: i32, password: &str) -> Self {
        Self {
            id,
            kind: PacketKind::Auth.to_wire(),
            body: password.to_string(),
        }
    }

    /// Builds a packet that runs `command` on the server.
    pub fn exec(id: i32, command: &Command) -> Self {
        Self {
            id,
            kind: PacketKind::ExecCommand.to_wire(),
            body: command.as_str().to_string(),
        }
    }

    /// Builds the empty packet sent after a command. Its reply marks the
    /// end of the command's (possibly fragmented) output.
    pub fn trailer(id: i32) -> Self {
        Self {
            id,
            kind: PacketKind::ResponseValue.to_wire(),
            body: String::new(),
        }
    }

    /// Returns `true` if this (incoming) packet answers a login attempt.
    pub fn is_auth_response(&self) -> bool {
        self.kind == PacketKind::AuthResponse.to_wire()
    }

    /// Returns `true` if this (incoming) packet carries command output.
    pub fn is_response_value(&self) -> bool {
        self.kind == PacketKind::ResponseValue.to_wire()
    }

    /// Returns `true` if the server rejected the login this packet answers.
    pub fn is_auth_failure(&self) -> bool {
        self.is_auth_response() && self.id == AUTH_FAILED_ID
    }
}

/// Auth packets carry the password, so the body is redacted.
impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: &str = if self.kind == PacketKind::Auth.to_wire() {
            "<redacted>"
        } else {
            &self.body
        };
        f.debug_struct("Packet")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("body", &body)
            .finish()
    }
}
