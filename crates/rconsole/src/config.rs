//! Environment-sourced configuration.
//!
//! | Variable | Required | Meaning |
//! |---|---|---|
//! | `RCON_HOST` | yes | console host name or address |
//! | `RCON_PORT` | yes | console port, 1–65535 |
//! | `RCON_PASSWORD` | yes | shared secret, never logged |
//! | `RCON_SESSION_REUSE` | no | `window` (default) or `none` |
//! | `RCON_FRESHNESS_MS` | no | freshness window, default 15000 |
//! | `RCON_COMMAND_TIMEOUT_MS` | no | first-attempt timeout, default 5000 |
//! | `RCON_CONNECT_TIMEOUT_MS` | no | handshake and read timeout, default 5000 |
//!
//! Everything is validated eagerly by [`Config::from_env`]; a bad value is
//! a startup error, not something a later command retries.

use std::time::Duration;

use rconsole_session::{Credentials, CredentialsError, SessionConfig, SessionReuse};

pub const HOST_VAR: &str = "RCON_HOST";
pub const PORT_VAR: &str = "RCON_PORT";
pub const PASSWORD_VAR: &str = "RCON_PASSWORD";
pub const REUSE_VAR: &str = "RCON_SESSION_REUSE";
pub const FRESHNESS_VAR: &str = "RCON_FRESHNESS_MS";
pub const COMMAND_TIMEOUT_VAR: &str = "RCON_COMMAND_TIMEOUT_MS";
pub const CONNECT_TIMEOUT_VAR: &str = "RCON_CONNECT_TIMEOUT_MS";

/// Configuration errors. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),
}

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub session: SessionConfig,
}

impl Config {
    /// Reads and validates the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads and validates configuration through `lookup`, which maps a
    /// variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = required(&lookup, HOST_VAR)?;
        let port = required(&lookup, PORT_VAR)?;
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Invalid {
            var: PORT_VAR,
            reason: "must be an integer between 1 and 65535".into(),
        })?;
        let password = required(&lookup, PASSWORD_VAR)?;
        let credentials = Credentials::new(host.trim(), port, password)?;

        let freshness = millis(&lookup, FRESHNESS_VAR, SessionConfig::DEFAULT_FRESHNESS_WINDOW)?;
        let reuse = match lookup(REUSE_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("window") => SessionReuse::FreshnessWindow(freshness),
            Some("none") => SessionReuse::None,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: REUSE_VAR,
                    reason: format!("expected `window` or `none`, got `{other}`"),
                });
            }
        };

        let session = SessionConfig {
            reuse,
            connect_timeout: millis(&lookup, CONNECT_TIMEOUT_VAR, SessionConfig::DEFAULT_CONNECT_TIMEOUT)?,
            command_timeout: millis(&lookup, COMMAND_TIMEOUT_VAR, SessionConfig::DEFAULT_COMMAND_TIMEOUT)?,
        };

        Ok(Self {
            credentials,
            session,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// A positive millisecond duration, or `default` when unset.
fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(var).filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::Invalid {
            var,
            reason: "must be a positive number of milliseconds".into(),
        }),
    }
}
