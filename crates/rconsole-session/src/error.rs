//! Error types for the session layer.

use std::time::Duration;

use rconsole_transport::TransportError;

/// Errors that can occur while running a command through a session.
///
/// Console output that *looks* like an error ("No player was found") is not
/// represented here: it is a successful response and is returned verbatim.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection or the login handshake failed.
    #[error("connection failed: {0}")]
    Connection(#[source] TransportError),

    /// The command did not complete within the command timeout.
    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    /// The connection failed while the command was in flight.
    #[error("command failed: {0}")]
    Transport(#[source] TransportError),

    /// The command failed, the session was re-established, and the retry
    /// failed too. `original` is the first failure, `last` the retry's.
    #[error("command failed after retry: {last}")]
    RetryExhausted {
        #[source]
        original: Box<SessionError>,
        last: Box<SessionError>,
    },
}

/// The category of a [`SessionError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    Connection,
    Timeout,
    Transport,
    RetryExhausted,
}

impl SessionError {
    /// Returns the category of this error.
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            Self::Connection(_) => SessionErrorKind::Connection,
            Self::Timeout(_) => SessionErrorKind::Timeout,
            Self::Transport(_) => SessionErrorKind::Transport,
            Self::RetryExhausted { .. } => SessionErrorKind::RetryExhausted,
        }
    }

    /// Returns `true` if this error is a timeout, whether enforced by the
    /// session or reported by the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Transport(TransportError::Timeout(_))
                | Self::Connection(TransportError::Timeout(_))
        )
    }
}
