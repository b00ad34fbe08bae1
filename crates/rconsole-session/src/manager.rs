//! The session manager: delivers commands over one remote console session.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Opening a session on first use, or when the old one went stale
//! - Reusing a fresh session (or never reusing one, per [`SessionReuse`])
//! - Racing each command against the command timeout
//! - Retrying exactly once on a fresh session after any failure
//! - Closing sessions without letting close errors hide the real failure
//!
//! # Concurrency
//!
//! RCON does not multiplex: a reply carries no more than the request id of
//! the command it answers, and a second command sent before the first reply
//! arrives gets its reply interleaved. The session slot therefore sits
//! behind a `tokio::sync::Mutex` that `execute` holds from
//! `ensure_session` through the retry. Callers that want parallelism
//! create one manager per call (the per-call deployment mode).
//!
//! # Lifecycle of one `execute`
//!
//! ```text
//! ensure ──→ send (timeout race) ──ok──→ touch ──→ response
//!                 │
//!               failure
//!                 ▼
//!        close ──→ ensure ──→ send ──ok──→ touch ──→ response
//!                                │
//!                              failure
//!                                ▼
//!                      close ──→ RetryExhausted
//! ```

use std::sync::Arc;
use std::time::Duration;

use rconsole_protocol::Command;
use rconsole_transport::{Connection, Transport};
use tokio::sync::Mutex;

use crate::{Credentials, Session, SessionConfig, SessionError};

type Slot<C> = Option<Session<C>>;

/// Owns at most one authenticated session and runs commands through it.
///
/// Generic over the [`Transport`] so tests can inject an in-memory fake and
/// production code uses [`TcpTransport`](rconsole_transport::TcpTransport).
/// There is no global instance: whoever builds a manager decides whether it
/// lives for one request or for the whole process.
pub struct SessionManager<T: Transport> {
    transport: Arc<T>,
    credentials: Arc<Credentials>,
    config: SessionConfig,
    slot: Mutex<Slot<T::Connection>>,
}

impl<T: Transport> SessionManager<T> {
    /// Creates a manager with no open session.
    pub fn new(
        transport: Arc<T>,
        credentials: Arc<Credentials>,
        config: SessionConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            config,
            slot: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns `true` if a session is currently open.
    pub async fn has_session(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Makes sure a usable session is open.
    ///
    /// Reuses the current session if the reuse policy considers it fresh;
    /// otherwise closes it and opens a new one.
    ///
    /// # Errors
    /// [`SessionError::Connection`] if the connect or login fails. The
    /// failure is returned as-is; `ensure_session` never retries.
    pub async fn ensure_session(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().await;
        self.ensure(&mut slot).await.map(|_| ())
    }

    /// Closes the current session, if any.
    ///
    /// Idempotent. Errors while closing are logged and swallowed.
    pub async fn close_session(&self) {
        let mut slot = self.slot.lock().await;
        self.close(&mut slot).await;
    }

    /// Runs `command` and returns the server's reply verbatim.
    ///
    /// The first attempt is bounded by
    /// [`command_timeout`](SessionConfig::command_timeout). On any failure
    /// the session is closed, a new one is opened, and the command is sent
    /// once more, bounded only by the transport's own deadline.
    ///
    /// With [`SessionReuse::None`](crate::SessionReuse::None) the session is
    /// closed before returning, whatever the outcome.
    ///
    /// # Errors
    /// [`SessionError::RetryExhausted`] if both attempts fail. No session
    /// is left open in that case.
    pub async fn execute(&self, command: &Command) -> Result<String, SessionError> {
        let mut slot = self.slot.lock().await;
        let result = self.execute_with_retry(&mut slot, command).await;
        if !self.config.reuse.is_enabled() {
            self.close(&mut slot).await;
        }
        result
    }

    async fn execute_with_retry(
        &self,
        slot: &mut Slot<T::Connection>,
        command: &Command,
    ) -> Result<String, SessionError> {
        let keyword = command.keyword();

        let original = match self
            .attempt(slot, command, Some(self.config.command_timeout))
            .await
        {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        tracing::warn!(
            command = keyword,
            endpoint = %self.credentials.endpoint(),
            error = %original,
            "command failed, retrying on a fresh session"
        );
        self.close(slot).await;

        match self.attempt(slot, command, None).await {
            Ok(response) => {
                tracing::info!(command = keyword, "command succeeded on retry");
                Ok(response)
            }
            Err(last) => {
                self.close(slot).await;
                tracing::error!(
                    command = keyword,
                    endpoint = %self.credentials.endpoint(),
                    error = %last,
                    "command failed after retry"
                );
                Err(SessionError::RetryExhausted {
                    original: Box::new(original),
                    last: Box::new(last),
                })
            }
        }
    }

    /// One delivery attempt: ensure a session, send, record the outcome.
    async fn attempt(
        &self,
        slot: &mut Slot<T::Connection>,
        command: &Command,
        timeout: Option<Duration>,
    ) -> Result<String, SessionError> {
        let session = self.ensure(slot).await?;

        session.in_flight = true;
        let result = match timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, session.connection.send(command)).await {
                    Ok(sent) => sent.map_err(SessionError::Transport),
                    Err(_) => Err(SessionError::Timeout(limit)),
                }
            }
            None => session
                .connection
                .send(command)
                .await
                .map_err(SessionError::Transport),
        };
        session.in_flight = false;

        if result.is_ok() {
            session.touch();
        }
        result
    }

    async fn ensure<'a>(
        &self,
        slot: &'a mut Slot<T::Connection>,
    ) -> Result<&'a mut Session<T::Connection>, SessionError> {
        let session = match slot.take() {
            Some(session)
                if !session.is_poisoned() && self.config.reuse.is_fresh(session.idle_for()) =>
            {
                tracing::trace!(id = %session.connection.id(), "reusing RCON session");
                session
            }
            stale => {
                if let Some(session) = stale {
                    tracing::debug!(
                        id = %session.connection.id(),
                        idle_ms = session.idle_for().as_millis() as u64,
                        poisoned = session.is_poisoned(),
                        "discarding RCON session"
                    );
                    self.close_connection(session).await;
                }
                Session::new(self.open().await?)
            }
        };
        Ok(slot.insert(session))
    }

    async fn open(&self) -> Result<T::Connection, SessionError> {
        let endpoint = self.credentials.endpoint();
        match self
            .transport
            .connect(endpoint, self.credentials.password(), self.config.connect_timeout)
            .await
        {
            Ok(connection) => {
                tracing::info!(id = %connection.id(), %endpoint, "RCON session opened");
                Ok(connection)
            }
            Err(e) => {
                tracing::warn!(%endpoint, error = %e, "failed to open RCON session");
                Err(SessionError::Connection(e))
            }
        }
    }

    async fn close(&self, slot: &mut Slot<T::Connection>) {
        if let Some(session) = slot.take() {
            self.close_connection(session).await;
        }
    }

    async fn close_connection(&self, mut session: Session<T::Connection>) {
        let id = session.connection.id();
        match session.connection.close().await {
            Ok(()) => tracing::debug!(%id, "RCON session closed"),
            Err(e) => tracing::warn!(%id, error = %e, "error while closing RCON session"),
        }
    }
}
