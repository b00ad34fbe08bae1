//! Session types: the connection a manager holds and the policy that
//! decides how long it may be reused.

use std::time::Duration;

use tokio::time::Instant;

// ---------------------------------------------------------------------------
// SessionReuse
// ---------------------------------------------------------------------------

/// Whether a session may outlive the call that opened it.
///
/// The two policies trade latency against trust in process state:
///
/// - [`SessionReuse::None`] opens a connection for every command and closes
///   it afterwards. Nothing survives between calls, which is what you want
///   when the hosting environment may freeze or recycle the process between
///   requests.
/// - [`SessionReuse::FreshnessWindow`] keeps the connection and reuses it
///   while it has been idle for no longer than the window. An older session
///   is closed and replaced before the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionReuse {
    None,
    FreshnessWindow(Duration),
}

impl SessionReuse {
    /// Returns `true` if a session idle for `idle` may be used again.
    pub fn is_fresh(&self, idle: Duration) -> bool {
        match self {
            Self::None => false,
            Self::FreshnessWindow(window) => idle <= *window,
        }
    }

    /// Returns `true` if sessions are kept between calls at all.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::FreshnessWindow(_))
    }
}

impl Default for SessionReuse {
    fn default() -> Self {
        Self::FreshnessWindow(SessionConfig::DEFAULT_FRESHNESS_WINDOW)
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Timing and reuse configuration for a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Reuse policy. Default: 15-second freshness window.
    pub reuse: SessionReuse,

    /// Bound on the connect + login handshake, also handed to the
    /// transport as its deadline for each command. Default: 5 seconds.
    pub connect_timeout: Duration,

    /// Bound on the first attempt of every command. Default: 5 seconds.
    pub command_timeout: Duration,
}

impl SessionConfig {
    pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(15);
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

    /// A config that opens and closes a connection for every command.
    pub fn per_call() -> Self {
        Self {
            reuse: SessionReuse::None,
            ..Default::default()
        }
    }

    /// A config that reuses sessions idle for at most `window`.
    pub fn with_freshness_window(window: Duration) -> Self {
        Self {
            reuse: SessionReuse::FreshnessWindow(window),
            ..Default::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reuse: SessionReuse::default(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            command_timeout: Self::DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated connection plus the bookkeeping needed to decide
/// whether it can be reused.
///
/// `last_used` uses tokio's clock so that tests running with paused time
/// can move a session past its freshness window without sleeping.
#[derive(Debug)]
pub struct Session<C> {
    pub(crate) connection: C,
    pub(crate) last_used: Instant,
    /// Set while a command is awaiting its reply. If the caller's future is
    /// dropped mid-command the flag stays set, and the session is discarded
    /// instead of reused: its next reply would belong to the abandoned
    /// command.
    pub(crate) in_flight: bool,
}

impl<C> Session<C> {
    pub(crate) fn new(connection: C) -> Self {
        Self {
            connection,
            last_used: Instant::now(),
            in_flight: false,
        }
    }

    /// How long since the session last completed a command (or opened).
    pub fn idle_for(&self) -> Duration {
        self.last_used.elapsed()
    }

    pub(crate) fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    /// Returns `true` if a command was abandoned while awaiting its reply.
    pub fn is_poisoned(&self) -> bool {
        self.in_flight
    }
}
