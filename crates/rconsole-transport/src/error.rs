use std::time::Duration;

use rconsole_protocol::ProtocolError;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The TCP connection could not be established.
    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The server refused the password.
    #[error("authentication rejected by {0}")]
    AuthRejected(String),

    /// A connect, read, or write did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The peer closed the connection.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// The peer sent bytes that are not valid RCON.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection was already closed locally.
    #[error("connection already closed")]
    Closed,
}
