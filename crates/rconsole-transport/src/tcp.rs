//! Source RCON over TCP.
//!
//! The handshake is a single `Auth` packet carrying the password. Some
//! servers answer with an empty `ResponseValue` before the real
//! `AuthResponse`; that packet is skipped. An auth response with id `-1`
//! means the password was wrong.
//!
//! Servers split output longer than one packet body into several
//! `ResponseValue` packets sharing the request id, with no marker on the
//! last one. Every command is therefore followed by an empty trailer
//! packet. Servers answer requests in order, so once the trailer's reply
//! arrives all fragments of the command's output have been read:
//!
//! ```text
//! client: Exec(id=7, "whitelist list")   Trailer(id=8)
//! server: Value(id=7, part 1)  Value(id=7, part 2)  Value(id=8, ...)
//!                                                   └─ reply complete
//! ```

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use rconsole_protocol::{Command, Packet, SIZE_PREFIX_BYTES};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;

use crate::{Connection, ConnectionId, Endpoint, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A [`Transport`] that dials the game server over TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    type Connection = TcpConnection;

    async fn connect(
        &self,
        endpoint: &Endpoint,
        password: &str,
        timeout: Duration,
    ) -> Result<Self::Connection, TransportError> {
        let stream = tokio::time::timeout(
            timeout,
            TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(timeout))?
        .map_err(|source| TransportError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "could not disable Nagle on RCON socket");
        }

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        let mut conn = TcpConnection {
            id,
            stream: Some(stream),
            next_request_id: initial_request_id(),
            timeout,
        };

        conn.authenticate(endpoint, password).await?;
        tracing::debug!(%id, %endpoint, "RCON connection authenticated");
        Ok(conn)
    }
}

/// Request ids start somewhere random so replies from an earlier
/// connection are never mistaken for replies on this one.
fn initial_request_id() -> i32 {
    rand::rng().random_range(1..=i32::MAX / 2)
}

/// An authenticated RCON connection over TCP.
#[derive(Debug)]
pub struct TcpConnection {
    id: ConnectionId,
    stream: Option<TcpStream>,
    next_request_id: i32,
    timeout: Duration,
}

impl TcpConnection {
    async fn authenticate(
        &mut self,
        endpoint: &Endpoint,
        password: &str,
    ) -> Result<(), TransportError> {
        let deadline = Instant::now() + self.timeout;
        let request_id = self.next_id();
        self.write_packet(&Packet::auth(request_id, password), deadline).await?;

        loop {
            let packet = self.read_packet(deadline).await?;
            if packet.is_auth_failure() {
                return Err(TransportError::AuthRejected(endpoint.to_string()));
            }
            if packet.is_auth_response() {
                if packet.id == request_id {
                    return Ok(());
                }
                return Err(rconsole_protocol::ProtocolError::Unexpected(format!(
                    "auth response for request {} while waiting for {request_id}",
                    packet.id
                ))
                .into());
            }
            tracing::trace!(id = %self.id, "skipping packet ahead of auth response");
        }
    }

    fn next_id(&mut self) -> i32 {
        let id = self.next_request_id;
        self.next_request_id = if id == i32::MAX { 1 } else { id + 1 };
        id
    }

    /// Writes one packet. Fails with `Timeout` once `deadline` passes.
    async fn write_packet(&mut self, packet: &Packet, deadline: Instant) -> Result<(), TransportError> {
        let frame = rconsole_protocol::encode(packet)?;
        let timeout = self.timeout;
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        tokio::time::timeout_at(deadline, stream.write_all(&frame))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
            .map_err(TransportError::SendFailed)
    }

    /// Reads one packet. Fails with `Timeout` once `deadline` passes.
    async fn read_packet(&mut self, deadline: Instant) -> Result<Packet, TransportError> {
        let timeout = self.timeout;
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;
        let frame = tokio::time::timeout_at(deadline, read_frame(stream))
            .await
            .map_err(|_| TransportError::Timeout(timeout))??;
        Ok(rconsole_protocol::decode(&frame)?)
    }
}

impl Connection for TcpConnection {
    /// Runs `command` and returns its output, reassembled from as many
    /// packets as the server split it into.
    ///
    /// The whole exchange shares one deadline, so a server that keeps
    /// sending unrelated packets cannot hold the call open.
    async fn send(&mut self, command: &Command) -> Result<String, TransportError> {
        let deadline = Instant::now() + self.timeout;
        let request_id = self.next_id();
        let trailer_id = self.next_id();
        self.write_packet(&Packet::exec(request_id, command), deadline).await?;
        self.write_packet(&Packet::trailer(trailer_id), deadline).await?;

        let mut output = String::new();
        loop {
            let packet = self.read_packet(deadline).await?;
            if packet.id == trailer_id {
                return Ok(output);
            }
            if packet.is_response_value() && packet.id == request_id {
                output.push_str(&packet.body);
                continue;
            }
            tracing::debug!(
                id = %self.id,
                expected = request_id,
                got = packet.id,
                "discarding unrelated RCON packet"
            );
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.take() {
            Some(mut stream) => {
                tracing::debug!(id = %self.id, "closing RCON connection");
                stream.shutdown().await.map_err(TransportError::SendFailed)
            }
            None => Ok(()),
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

async fn read_frame(stream: &mut TcpStream) -> Result<Vec<u8>, TransportError> {
    let mut prefix = [0u8; SIZE_PREFIX_BYTES];
    stream.read_exact(&mut prefix).await.map_err(read_error)?;
    let len = rconsole_protocol::frame_len(prefix)?;
    let mut frame = vec![0u8; len];
    stream.read_exact(&mut frame).await.map_err(read_error)?;
    Ok(frame)
}

fn read_error(e: io::Error) -> TransportError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            TransportError::ConnectionClosed("server closed the connection".into())
        }
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            TransportError::ConnectionClosed("server reset the connection".into())
        }
        _ => TransportError::ReceiveFailed(e),
    }
}
