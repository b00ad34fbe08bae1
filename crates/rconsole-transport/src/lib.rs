//! Transport abstraction layer for rconsole.
//!
//! Provides the [`Transport`] and [`Connection`] traits that the session
//! layer drives, plus [`TcpTransport`], the Source RCON implementation used
//! against real game servers. Tests substitute their own in-memory
//! transports through the same traits.
//!
//! The futures returned by both traits are `Send` so a session can be
//! driven from any task on a multi-threaded runtime. Implementations are
//! free to write plain `async fn` bodies.

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{TcpConnection, TcpTransport};

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rconsole_protocol::Command;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Where a remote console listens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opens authenticated connections to a remote console.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;

    /// Connects to `endpoint` and logs in with `password`.
    ///
    /// `timeout` bounds the handshake and every later read on the
    /// returned connection.
    fn connect(
        &self,
        endpoint: &Endpoint,
        password: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single authenticated console connection.
///
/// The protocol does not multiplex: one command is in flight at a time,
/// which is why `send` takes `&mut self`.
pub trait Connection: Send + 'static {
    /// Runs `command` and returns the server's output verbatim.
    fn send(
        &mut self,
        command: &Command,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Closes the connection. Further sends fail with
    /// [`TransportError::Closed`].
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
