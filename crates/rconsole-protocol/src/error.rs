//! Error types for the protocol layer.
//!
//! Two kinds of things can go wrong here, and they are kept apart on
//! purpose: a [`ProtocolError`] means bytes on the wire were malformed,
//! while an [`ArgumentError`] means an operator typed something that cannot
//! be turned into a safe console command. The first is a transport-level
//! failure worth retrying; the second is the caller's problem and is never
//! retried.

/// Errors that can occur while framing or parsing RCON packets.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The declared frame size is below the 10-byte minimum
    /// (id + type + two NUL terminators).
    #[error("frame too short: {0} bytes")]
    FrameTooShort(usize),

    /// The declared frame size exceeds what a server may send in one packet.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// The body and padding terminators were not both NUL.
    #[error("frame is missing its NUL terminators")]
    MissingTerminator,

    /// The body is not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An outgoing body contains a NUL byte, which would end it early.
    #[error("body contains a NUL byte")]
    EmbeddedNul,

    /// An outgoing body is longer than the server accepts.
    #[error("body is {len} bytes, limit is {max}")]
    BodyTooLong { len: usize, max: usize },

    /// The peer sent something that is well-formed but out of sequence,
    /// e.g. an auth response carrying the wrong request id.
    #[error("unexpected packet: {0}")]
    Unexpected(String),
}

/// An operator-supplied argument was rejected while building a command.
///
/// The message names the argument and the rule it broke, e.g.
/// `invalid player: must not contain whitespace`. It never includes
/// anything about the connection, so it is safe to show to an operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {argument}: {reason}")]
pub struct ArgumentError {
    /// Which argument was rejected (`player`, `item`, `reason`, ...).
    pub argument: &'static str,
    /// Why it was rejected.
    pub reason: String,
}

impl ArgumentError {
    pub(crate) fn new(argument: &'static str, reason: impl Into<String>) -> Self {
        Self {
            argument,
            reason: reason.into(),
        }
    }
}
