//! The console: typed administrative operations over a session manager.
//!
//! [`Console`] is what the rest of an application holds. It decides, from
//! the configured [`SessionReuse`], which of the two deployment modes
//! applies:
//!
//! - **Shared**: one [`SessionManager`] for the console's lifetime; its
//!   session is reused inside the freshness window and commands queue
//!   behind each other.
//! - **Per-call**: a new `SessionManager` (and so a new connection) for
//!   every call, torn down before the call returns. Calls do not share
//!   anything and may run in parallel.

use std::sync::Arc;
use std::time::Duration;

use rconsole_protocol::{Command, GameMode, TimeSetting, Weather, WhitelistAction};
use rconsole_session::{Credentials, SessionConfig, SessionManager, SessionReuse};
use rconsole_transport::Transport;

use crate::config::Config;
use crate::RconsoleError;

/// Warning period [`Console::restart`] callers use unless told otherwise.
pub const DEFAULT_RESTART_WARNING: Duration = Duration::from_secs(10);

/// How a [`Console`] scopes its sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    PerCall,
    Shared,
}

/// Runs administrative commands against one game server.
pub struct Console<T: Transport> {
    transport: Arc<T>,
    credentials: Arc<Credentials>,
    config: SessionConfig,
    shared: Option<SessionManager<T>>,
}

impl<T: Transport> Console<T> {
    /// Creates a console. No connection is made until the first command.
    pub fn new(transport: T, credentials: Credentials, config: SessionConfig) -> Self {
        let transport = Arc::new(transport);
        let credentials = Arc::new(credentials);
        let shared = match config.reuse {
            SessionReuse::FreshnessWindow(_) => Some(SessionManager::new(
                Arc::clone(&transport),
                Arc::clone(&credentials),
                config.clone(),
            )),
            SessionReuse::None => None,
        };
        Self {
            transport,
            credentials,
            config,
            shared,
        }
    }

    /// Creates a console from validated [`Config`].
    pub fn from_config(transport: T, config: Config) -> Self {
        Self::new(transport, config.credentials, config.session)
    }

    pub fn mode(&self) -> ConsoleMode {
        if self.shared.is_some() {
            ConsoleMode::Shared
        } else {
            ConsoleMode::PerCall
        }
    }

    /// Returns the shared session manager, if running in shared mode.
    pub fn session_manager(&self) -> Option<&SessionManager<T>> {
        self.shared.as_ref()
    }

    /// Runs a prepared command and returns the server's reply verbatim.
    pub async fn execute(&self, command: &Command) -> Result<String, RconsoleError> {
        match &self.shared {
            Some(manager) => Ok(manager.execute(command).await?),
            None => {
                let manager = SessionManager::new(
                    Arc::clone(&self.transport),
                    Arc::clone(&self.credentials),
                    self.config.clone(),
                );
                let result = manager.execute(command).await;
                manager.close_session().await;
                Ok(result?)
            }
        }
    }

    /// Closes the shared session, if there is one.
    pub async fn shutdown(&self) {
        if let Some(manager) = &self.shared {
            manager.close_session().await;
        }
    }

    // -- Chat ------------------------------------------------------------

    /// `tellraw @a "<message>"`
    pub async fn broadcast(&self, message: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::broadcast(message)?).await
    }

    /// `say <message>`
    pub async fn say(&self, message: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::say(message)?).await
    }

    // -- Moderation ------------------------------------------------------

    pub async fn kick(&self, player: &str, reason: Option<&str>) -> Result<String, RconsoleError> {
        self.execute(&Command::kick(player, reason)?).await
    }

    pub async fn ban(&self, player: &str, reason: Option<&str>) -> Result<String, RconsoleError> {
        self.execute(&Command::ban(player, reason)?).await
    }

    pub async fn ban_ip(&self, address: &str, reason: Option<&str>) -> Result<String, RconsoleError> {
        self.execute(&Command::ban_ip(address, reason)?).await
    }

    pub async fn pardon(&self, player: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::pardon(player)?).await
    }

    pub async fn pardon_ip(&self, address: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::pardon_ip(address)?).await
    }

    pub async fn op(&self, player: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::op(player)?).await
    }

    pub async fn deop(&self, player: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::deop(player)?).await
    }

    // -- Players and world -----------------------------------------------

    pub async fn teleport(&self, target: &str, destination: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::teleport(target, destination)?).await
    }

    pub async fn give(
        &self,
        player: &str,
        item: &str,
        amount: Option<u32>,
    ) -> Result<String, RconsoleError> {
        self.execute(&Command::give(player, item, amount)?).await
    }

    pub async fn set_weather(&self, weather: Weather) -> Result<String, RconsoleError> {
        self.execute(&Command::weather(weather)).await
    }

    pub async fn set_time(&self, setting: TimeSetting) -> Result<String, RconsoleError> {
        self.execute(&Command::time(setting)).await
    }

    pub async fn set_game_mode(&self, player: &str, mode: GameMode) -> Result<String, RconsoleError> {
        self.execute(&Command::gamemode(player, mode)?).await
    }

    pub async fn set_whitelist(&self, action: &WhitelistAction) -> Result<String, RconsoleError> {
        self.execute(&Command::whitelist(action)?).await
    }

    /// Returns the raw `list` output; parsing player counts is up to the
    /// caller.
    pub async fn list_players(&self) -> Result<String, RconsoleError> {
        self.execute(&Command::list()).await
    }

    /// Runs an operator-typed line without templating.
    pub async fn execute_raw(&self, line: &str) -> Result<String, RconsoleError> {
        self.execute(&Command::raw(line)?).await
    }

    // -- Server ----------------------------------------------------------

    /// Warns players, waits `warning`, then issues `restart`.
    pub async fn restart(&self, warning: Duration) -> Result<String, RconsoleError> {
        let notice = format!(
            "Server will restart in {} seconds. Please prepare for disconnection.",
            warning.as_secs()
        );
        self.say(&notice).await?;
        tokio::time::sleep(warning).await;
        tracing::info!(endpoint = %self.credentials.endpoint(), "issuing server restart");
        self.execute(&Command::raw("restart")?).await
    }
}
