//! Operator-facing actions.
//!
//! Each action takes deserialized form input, runs it through a
//! [`Console`], and always returns an [`ActionResult`]. Nothing that
//! reaches the operator carries error detail: failures, including rejected
//! arguments, are logged in full and replaced with the action's fixed
//! message.
//!
//! ```text
//! {"player":"Grief3r"} ──→ kick_player ──→ Console::kick ──→ "kick Grief3r"
//!                                │
//!                                ▼
//!     {"success":true,"message":"Kicked Grief3r"}
//!     {"success":false,"error":"Failed to kick player"}
//! ```

use std::time::Duration;

use rconsole_protocol::{GameMode, TimeSetting, Weather, WhitelistAction, WhitelistVerb};
use rconsole_transport::Transport;
use serde::{Deserialize, Serialize};

use crate::console::{Console, DEFAULT_RESTART_WARNING};
use crate::RconsoleError;

/// Longest chat message an operator may send through [`send_message`].
pub const MAX_MESSAGE_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// What the operator interface receives.
///
/// Serializes as `{"success":true,"message":...}` or
/// `{"success":false,"error":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageArgs {
    pub message: String,
}

/// Kick and ban input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActionArgs {
    pub player: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Pardon, op and deop input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PardonArgs {
    pub player: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressActionArgs {
    pub address: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiveItemArgs {
    pub player: String,
    pub item: String,
    #[serde(default = "default_amount")]
    pub amount: Option<u32>,
}

fn default_amount() -> Option<u32> {
    Some(1)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleportArgs {
    pub target: String,
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModeArgs {
    pub player: String,
    pub mode: GameMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherArgs {
    #[serde(rename = "type")]
    pub weather: Weather,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeArgs {
    pub setting: TimeSetting,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistArgs {
    pub action: WhitelistVerb,
    #[serde(default)]
    pub player: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommandArgs {
    pub command: String,
}

/// Restart input. The warning defaults to [`DEFAULT_RESTART_WARNING`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartArgs {
    #[serde(default)]
    pub warning_seconds: Option<u64>,
}

// ---------------------------------------------------------------------------
// Chat and players
// ---------------------------------------------------------------------------

pub async fn send_message<T: Transport>(console: &Console<T>, args: MessageArgs) -> ActionResult {
    const FAILURE: &str = "Failed to send message";
    if args.message.chars().count() > MAX_MESSAGE_CHARS {
        tracing::warn!(
            action = "send_message",
            limit = MAX_MESSAGE_CHARS,
            "message rejected: too long"
        );
        return ActionResult::failed(FAILURE);
    }
    respond("send_message", FAILURE, console.broadcast(&args.message).await)
}

pub async fn get_online_players<T: Transport>(console: &Console<T>) -> ActionResult {
    respond(
        "get_online_players",
        "Failed to get player list",
        console.list_players().await,
    )
}

pub async fn kick_player<T: Transport>(console: &Console<T>, args: PlayerActionArgs) -> ActionResult {
    let result = console.kick(&args.player, args.reason.as_deref()).await;
    respond("kick_player", "Failed to kick player", result)
}

pub async fn ban_player<T: Transport>(console: &Console<T>, args: PlayerActionArgs) -> ActionResult {
    let result = console.ban(&args.player, args.reason.as_deref()).await;
    respond("ban_player", "Failed to ban player", result)
}

pub async fn ban_ip<T: Transport>(console: &Console<T>, args: AddressActionArgs) -> ActionResult {
    let result = console.ban_ip(&args.address, args.reason.as_deref()).await;
    respond("ban_ip", "Failed to ban IP address", result)
}

pub async fn pardon_player<T: Transport>(console: &Console<T>, args: PardonArgs) -> ActionResult {
    let result = console.pardon(&args.player).await;
    respond("pardon_player", "Failed to pardon player", result)
}

pub async fn pardon_ip<T: Transport>(console: &Console<T>, args: AddressActionArgs) -> ActionResult {
    let result = console.pardon_ip(&args.address).await;
    respond("pardon_ip", "Failed to pardon IP address", result)
}

pub async fn op_player<T: Transport>(console: &Console<T>, args: PardonArgs) -> ActionResult {
    respond("op_player", "Failed to op player", console.op(&args.player).await)
}

pub async fn deop_player<T: Transport>(console: &Console<T>, args: PardonArgs) -> ActionResult {
    respond("deop_player", "Failed to deop player", console.deop(&args.player).await)
}

// ---------------------------------------------------------------------------
// Items and world
// ---------------------------------------------------------------------------

pub async fn give_item<T: Transport>(console: &Console<T>, args: GiveItemArgs) -> ActionResult {
    let result = console.give(&args.player, &args.item, args.amount).await;
    respond("give_item", "Failed to give item", result)
}

pub async fn teleport_player<T: Transport>(console: &Console<T>, args: TeleportArgs) -> ActionResult {
    let result = console.teleport(&args.target, &args.destination).await;
    respond("teleport_player", "Failed to teleport player", result)
}

pub async fn change_game_mode<T: Transport>(console: &Console<T>, args: GameModeArgs) -> ActionResult {
    let result = console.set_game_mode(&args.player, args.mode).await;
    respond("change_game_mode", "Failed to change gamemode", result)
}

pub async fn change_weather<T: Transport>(console: &Console<T>, args: WeatherArgs) -> ActionResult {
    let result = console.set_weather(args.weather).await;
    respond("change_weather", "Failed to change weather", result)
}

pub async fn change_time<T: Transport>(console: &Console<T>, args: TimeArgs) -> ActionResult {
    let result = console.set_time(args.setting).await;
    respond("change_time", "Failed to change time", result)
}

pub async fn manage_whitelist<T: Transport>(console: &Console<T>, args: WhitelistArgs) -> ActionResult {
    const FAILURE: &str = "Failed to manage whitelist";
    let action = match WhitelistAction::from_parts(args.action, args.player.as_deref()) {
        Ok(action) => action,
        Err(e) => return respond("manage_whitelist", FAILURE, Err(e.into())),
    };
    respond("manage_whitelist", FAILURE, console.set_whitelist(&action).await)
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub async fn execute_raw_command<T: Transport>(
    console: &Console<T>,
    args: RawCommandArgs,
) -> ActionResult {
    let result = console.execute_raw(&args.command).await;
    respond("execute_raw_command", "Failed to execute command", result)
}

/// Warns players, waits, then restarts the server.
///
/// The server's reply to `restart` is not shown; on success the operator
/// sees a fixed confirmation.
pub async fn restart_server<T: Transport>(console: &Console<T>, args: RestartArgs) -> ActionResult {
    let warning = args
        .warning_seconds
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RESTART_WARNING);
    match console.restart(warning).await {
        Ok(_) => ActionResult::ok("Server restart initiated successfully"),
        Err(e) => {
            tracing::error!(action = "restart_server", error = %e, "action failed");
            ActionResult::failed("Failed to restart the server. Please try again later.")
        }
    }
}

/// Converts an outcome into what the operator sees.
///
/// Responses pass through verbatim, even when they read like an error: the
/// server accepted the command and answered it.
fn respond(action: &'static str, failure: &str, result: Result<String, RconsoleError>) -> ActionResult {
    match result {
        Ok(response) => ActionResult::ok(response),
        Err(RconsoleError::Argument(e)) => {
            tracing::warn!(action, error = %e, "action rejected");
            ActionResult::failed(failure)
        }
        Err(e) => {
            tracing::error!(action, error = %e, "action failed");
            ActionResult::failed(failure)
        }
    }
}
