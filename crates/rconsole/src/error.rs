//! Unified error type for rconsole.

use rconsole_protocol::ArgumentError;
use rconsole_session::SessionError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RconsoleError {
    /// Missing or malformed configuration. Fatal, never retried.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operator-supplied argument cannot be turned into a safe command.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The command could not be delivered (connection, timeout, retry).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A global tracing subscriber was already installed.
    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rconsole_protocol::Command;

    use super::*;

    #[test]
    fn test_from_argument_error() {
        let err = Command::pardon("").unwrap_err();
        let err: RconsoleError = err.into();
        assert!(matches!(err, RconsoleError::Argument(_)));
        assert!(err.to_string().contains("player"));
    }

    #[test]
    fn test_from_session_error() {
        let err: RconsoleError = SessionError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, RconsoleError::Session(_)));
    }

    #[test]
    fn test_from_config_error() {
        let err: RconsoleError = ConfigError::Missing("RCON_HOST").into();
        assert!(matches!(err, RconsoleError::Config(_)));
        assert!(err.to_string().contains("RCON_HOST"));
    }
}
