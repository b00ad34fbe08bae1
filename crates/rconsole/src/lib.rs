//! # rconsole
//!
//! Reliable remote console (RCON) client for game server administration.
//!
//! rconsole sends administrative commands to a game server over its remote
//! console and hands back the server's reply. Commands are built from typed
//! arguments, delivered over a session that is reused while fresh, bounded
//! by a timeout, and retried once on a fresh session when anything goes
//! wrong.
//!
//! ```text
//! actions      ← form input in, ActionResult out
//!    ↕
//! Console      ← typed operations, per-call or shared sessions
//!    ↕
//! SessionManager (rconsole-session)  ← reuse, timeout, retry
//!    ↕
//! TcpTransport (rconsole-transport)  ← sockets, login, framing
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rconsole::prelude::*;
//!
//! # async fn run() -> Result<(), RconsoleError> {
//! let config = Config::from_env()?;
//! let console = Console::from_config(TcpTransport, config);
//! let players = console.list_players().await?;
//! println!("{players}");
//! console.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod console;
mod error;
pub mod logging;

pub use actions::ActionResult;
pub use config::{Config, ConfigError};
pub use console::{Console, ConsoleMode, DEFAULT_RESTART_WARNING};
pub use error::RconsoleError;

pub use rconsole_protocol as protocol;
pub use rconsole_session as session;
pub use rconsole_transport as transport;

pub mod prelude {
    pub use crate::actions::ActionResult;
    pub use crate::config::Config;
    pub use crate::console::{Console, ConsoleMode};
    pub use crate::error::RconsoleError;
    pub use rconsole_protocol::{Command, GameMode, TimeSetting, Weather, WhitelistAction};
    pub use rconsole_session::{Credentials, SessionConfig, SessionReuse};
    pub use rconsole_transport::TcpTransport;
}
