//! Connection credentials.
//!
//! Credentials are validated once, when they are built. A `Credentials`
//! value that exists is therefore always usable for a connection attempt,
//! and a bad host or empty password surfaces as a configuration error at
//! startup instead of as a retried connection failure later.

use std::fmt;

use rconsole_protocol::MAX_COMMAND_BYTES;
use rconsole_transport::Endpoint;

/// Why a set of credentials was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("host must not be empty or contain whitespace")]
    InvalidHost,

    #[error("port must be between 1 and 65535")]
    InvalidPort,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password must not contain NUL bytes or exceed {MAX_COMMAND_BYTES} bytes")]
    InvalidPassword,
}

/// Host, port, and shared secret of a remote console.
///
/// The `Debug` impl never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    endpoint: Endpoint,
    password: String,
}

impl Credentials {
    /// Validates and builds a set of credentials.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let host = host.into();
        let password = password.into();
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(CredentialsError::InvalidHost);
        }
        if port == 0 {
            return Err(CredentialsError::InvalidPort);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        if password.len() > MAX_COMMAND_BYTES || password.contains('\0') {
            return Err(CredentialsError::InvalidPassword);
        }
        Ok(Self {
            endpoint: Endpoint::new(host, port),
            password,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("password", &"<redacted>")
            .finish()
    }
}
