//! Remote console session management for rconsole.
//!
//! This crate owns the lifecycle of the one authenticated connection a
//! client keeps to a game server:
//!
//! 1. **Credentials**: where to connect and with what secret
//!    ([`Credentials`])
//! 2. **Freshness**: whether an idle session may be reused or must be
//!    re-established ([`SessionReuse`], [`SessionConfig`])
//! 3. **Execution**: sending a command under a timeout and retrying
//!    exactly once on a fresh session after any failure
//!    ([`SessionManager::execute`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Console / actions (above)  ← typed operations, boundary mapping
//!     ↕
//! Session Layer (this crate)  ← reuse policy, timeouts, retry
//!     ↕
//! Transport Layer (below)  ← sockets and RCON framing
//! ```

mod credentials;
mod error;
mod manager;
mod session;

pub use credentials::{Credentials, CredentialsError};
pub use error::{SessionError, SessionErrorKind};
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionReuse};
