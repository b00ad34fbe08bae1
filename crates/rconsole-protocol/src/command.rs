//! Typed console commands.
//!
//! A [`Command`] is the text of one console line, e.g. `kick Steve griefing`.
//! Commands are only built through the constructors below (or
//! [`Command::raw`] for operator-typed lines), and every constructor checks
//! its arguments before formatting. A player name like `Steve; op Mallory`
//! or a reason containing a newline is rejected instead of being pasted
//! into the console.
//!
//! Templates:
//!
//! ```text
//! broadcast  tellraw @a "<message>"
//! say        say <message>
//! kick       kick <player>[ <reason>]
//! ban        ban <player>[ <reason>]
//! ban_ip     ban-ip <address>[ <reason>]
//! pardon     pardon <player>
//! pardon_ip  pardon-ip <address>
//! op / deop  op <player> / deop <player>
//! teleport   tp <target> <destination>
//! give       give <player> <item>[ <amount>]
//! weather    weather <clear|rain|thunder>
//! time       time set <day|night|<integer>>
//! gamemode   gamemode <mode> <player>
//! whitelist  whitelist <add|remove|list|on|off|reload>[ <player>]
//! list       list
//! ```

use std::fmt;

use serde::Deserialize;

use crate::codec::MAX_COMMAND_BYTES;
use crate::ArgumentError;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// An immutable, validated console command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command(String);

impl Command {
    /// Returns the command text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the command and returns its text.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the first word of the command (`kick`, `tellraw`, ...).
    ///
    /// Used for logging: the keyword says what kind of command ran without
    /// echoing operator-supplied arguments.
    pub fn keyword(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or_default()
    }

    /// Sends `message` to every player as a chat line.
    ///
    /// The message is embedded as a JSON string literal, so quotes,
    /// backslashes and control characters are escaped rather than ending
    /// the `tellraw` argument early.
    pub fn broadcast(message: &str) -> Result<Self, ArgumentError> {
        if message.trim().is_empty() {
            return Err(ArgumentError::new("message", "must not be empty"));
        }
        let literal = serde_json::to_string(message)
            .map_err(|e| ArgumentError::new("message", e.to_string()))?;
        Self::finish(format!("tellraw @a {literal}"))
    }

    /// Sends `message` through the server's `say` command.
    pub fn say(message: &str) -> Result<Self, ArgumentError> {
        let message = free_text("message", message)?
            .ok_or_else(|| ArgumentError::new("message", "must not be empty"))?;
        Self::finish(format!("say {message}"))
    }

    /// Disconnects a player, optionally with a reason.
    pub fn kick(player: &str, reason: Option<&str>) -> Result<Self, ArgumentError> {
        Self::with_reason("kick", token("player", player)?, reason)
    }

    /// Bans a player, optionally with a reason.
    pub fn ban(player: &str, reason: Option<&str>) -> Result<Self, ArgumentError> {
        Self::with_reason("ban", token("player", player)?, reason)
    }

    /// Bans an IP address (or the address of an online player).
    pub fn ban_ip(address: &str, reason: Option<&str>) -> Result<Self, ArgumentError> {
        Self::with_reason("ban-ip", token("address", address)?, reason)
    }

    /// Lifts a player ban.
    pub fn pardon(player: &str) -> Result<Self, ArgumentError> {
        Self::finish(format!("pardon {}", token("player", player)?))
    }

    /// Lifts an IP ban.
    pub fn pardon_ip(address: &str) -> Result<Self, ArgumentError> {
        Self::finish(format!("pardon-ip {}", token("address", address)?))
    }

    /// Grants operator status.
    pub fn op(player: &str) -> Result<Self, ArgumentError> {
        Self::finish(format!("op {}", token("player", player)?))
    }

    /// Revokes operator status.
    pub fn deop(player: &str) -> Result<Self, ArgumentError> {
        Self::finish(format!("deop {}", token("player", player)?))
    }

    /// Teleports `target` to `destination`.
    ///
    /// The destination is either a single token (a player name or selector)
    /// or up to three coordinate tokens such as `~ 64 ~-10`.
    pub fn teleport(target: &str, destination: &str) -> Result<Self, ArgumentError> {
        let target = token("target", target)?;
        let destination = coordinates("destination", destination)?;
        Self::finish(format!("tp {target} {destination}"))
    }

    /// Gives `player` an item, optionally a specific amount of it.
    pub fn give(player: &str, item: &str, amount: Option<u32>) -> Result<Self, ArgumentError> {
        let player = token("player", player)?;
        let item = token("item", item)?;
        match amount {
            Some(0) => Err(ArgumentError::new("amount", "must be at least 1")),
            Some(amount) => Self::finish(format!("give {player} {item} {amount}")),
            None => Self::finish(format!("give {player} {item}")),
        }
    }

    /// Changes the weather.
    pub fn weather(weather: Weather) -> Self {
        Self(format!("weather {weather}"))
    }

    /// Sets the time of day.
    pub fn time(setting: TimeSetting) -> Self {
        Self(format!("time set {setting}"))
    }

    /// Switches a player's game mode.
    pub fn gamemode(player: &str, mode: GameMode) -> Result<Self, ArgumentError> {
        Self::finish(format!("gamemode {mode} {}", token("player", player)?))
    }

    /// Runs a whitelist subcommand.
    pub fn whitelist(action: &WhitelistAction) -> Result<Self, ArgumentError> {
        let verb = action.verb();
        match action.player() {
            Some(player) => Self::finish(format!("whitelist {verb} {}", token("player", player)?)),
            None => Self::finish(format!("whitelist {verb}")),
        }
    }

    /// Lists online players.
    pub fn list() -> Self {
        Self("list".to_string())
    }

    /// Wraps an operator-typed console line without templating.
    ///
    /// The text is passed through unmodified; only emptiness and the
    /// server's length limit are checked.
    pub fn raw(text: &str) -> Result<Self, ArgumentError> {
        if text.trim().is_empty() {
            return Err(ArgumentError::new("command", "must not be empty"));
        }
        Self::finish(text.to_string())
    }

    fn with_reason(
        keyword: &str,
        subject: &str,
        reason: Option<&str>,
    ) -> Result<Self, ArgumentError> {
        match reason.map(|r| free_text("reason", r)).transpose()?.flatten() {
            Some(reason) => Self::finish(format!("{keyword} {subject} {reason}")),
            None => Self::finish(format!("{keyword} {subject}")),
        }
    }

    fn finish(text: String) -> Result<Self, ArgumentError> {
        if text.len() > MAX_COMMAND_BYTES {
            return Err(ArgumentError::new(
                "command",
                format!("is {} bytes, limit is {MAX_COMMAND_BYTES}", text.len()),
            ));
        }
        Ok(Self(text))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Argument validation
// ---------------------------------------------------------------------------

/// A single word: player name, selector, item id, IP address.
fn token<'a>(argument: &'static str, value: &'a str) -> Result<&'a str, ArgumentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ArgumentError::new(argument, "must not be empty"));
    }
    if value.chars().any(char::is_control) {
        return Err(ArgumentError::new(argument, "must not contain control characters"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ArgumentError::new(argument, "must not contain whitespace"));
    }
    if value.contains(['"', '\\']) {
        return Err(ArgumentError::new(argument, "must not contain quotes or backslashes"));
    }
    Ok(value)
}

/// Trailing text that may contain spaces. Blank input means "absent".
fn free_text<'a>(
    argument: &'static str,
    value: &'a str,
) -> Result<Option<&'a str>, ArgumentError> {
    let value = value.trim();
    if value.chars().any(char::is_control) {
        return Err(ArgumentError::new(argument, "must not contain control characters"));
    }
    Ok((!value.is_empty()).then_some(value))
}

/// One to three tokens, re-joined with single spaces.
fn coordinates(argument: &'static str, value: &str) -> Result<String, ArgumentError> {
    if value.chars().any(char::is_control) {
        return Err(ArgumentError::new(argument, "must not contain control characters"));
    }
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.is_empty() {
        return Err(ArgumentError::new(argument, "must not be empty"));
    }
    if parts.len() > 3 {
        return Err(ArgumentError::new(
            argument,
            "must be a single target or at most three coordinates",
        ));
    }
    for part in &parts {
        token(argument, part)?;
    }
    Ok(parts.join(" "))
}

// ---------------------------------------------------------------------------
// Typed arguments
// ---------------------------------------------------------------------------

/// A player game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Survival => "survival",
            Self::Creative => "creative",
            Self::Adventure => "adventure",
            Self::Spectator => "spectator",
        })
    }
}

/// World weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Rain,
    Thunder,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Thunder => "thunder",
        })
    }
}

/// Target for `time set`: a named time of day or an absolute tick count.
///
/// Deserializes from `"day"`, `"night"`, or a non-negative integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "TimeSettingRepr")]
pub enum TimeSetting {
    Day,
    Night,
    Ticks(u32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeSettingRepr {
    Ticks(u32),
    Named(NamedTime),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamedTime {
    Day,
    Night,
}

impl From<TimeSettingRepr> for TimeSetting {
    fn from(repr: TimeSettingRepr) -> Self {
        match repr {
            TimeSettingRepr::Ticks(ticks) => Self::Ticks(ticks),
            TimeSettingRepr::Named(NamedTime::Day) => Self::Day,
            TimeSettingRepr::Named(NamedTime::Night) => Self::Night,
        }
    }
}

impl fmt::Display for TimeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("day"),
            Self::Night => f.write_str("night"),
            Self::Ticks(ticks) => write!(f, "{ticks}"),
        }
    }
}

/// The whitelist subcommand keyword, as received from a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistVerb {
    Add,
    Remove,
    List,
    On,
    Off,
    Reload,
}

impl fmt::Display for WhitelistVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::List => "list",
            Self::On => "on",
            Self::Off => "off",
            Self::Reload => "reload",
        })
    }
}

/// A whitelist subcommand together with the player it needs, if any.
///
/// `add` and `remove` carry their player so a bare `whitelist add` cannot
/// be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistAction {
    Add(String),
    Remove(String),
    List,
    On,
    Off,
    Reload,
}

impl WhitelistAction {
    /// Pairs a verb with an optional player, as submitted by a form.
    ///
    /// A blank player counts as absent. `add`/`remove` require a player;
    /// the other verbs refuse one.
    pub fn from_parts(verb: WhitelistVerb, player: Option<&str>) -> Result<Self, ArgumentError> {
        let player = player.map(str::trim).filter(|p| !p.is_empty());
        match (verb, player) {
            (WhitelistVerb::Add, Some(p)) => Ok(Self::Add(p.to_string())),
            (WhitelistVerb::Remove, Some(p)) => Ok(Self::Remove(p.to_string())),
            (WhitelistVerb::Add | WhitelistVerb::Remove, None) => Err(ArgumentError::new(
                "player",
                format!("is required for whitelist {verb}"),
            )),
            (WhitelistVerb::List, None) => Ok(Self::List),
            (WhitelistVerb::On, None) => Ok(Self::On),
            (WhitelistVerb::Off, None) => Ok(Self::Off),
            (WhitelistVerb::Reload, None) => Ok(Self::Reload),
            (_, Some(_)) => Err(ArgumentError::new(
                "player",
                format!("is not accepted by whitelist {verb}"),
            )),
        }
    }

    /// Returns the subcommand keyword.
    pub fn verb(&self) -> WhitelistVerb {
        match self {
            Self::Add(_) => WhitelistVerb::Add,
            Self::Remove(_) => WhitelistVerb::Remove,
            Self::List => WhitelistVerb::List,
            Self::On => WhitelistVerb::On,
            Self::Off => WhitelistVerb::Off,
            Self::Reload => WhitelistVerb::Reload,
        }
    }

    /// Returns the player the subcommand targets, if any.
    pub fn player(&self) -> Option<&str> {
        match self {
            Self::Add(p) | Self::Remove(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for command templates.
    //!
    //! Naming convention: `test_{builder}_{scenario}`. Each template gets
    //! an exact-string check; the validation tests check that hostile input
    //! is refused rather than formatted.

    use super::*;

    // =====================================================================
    // Templates
    // =====================================================================

    #[test]
    fn test_broadcast_plain_message() {
        let cmd = Command::broadcast("Server restarting soon").unwrap();
        assert_eq!(cmd.as_str(), r#"tellraw @a "Server restarting soon""#);
    }

    #[test]
    fn test_broadcast_escapes_quotes_and_backslashes() {
        let cmd = Command::broadcast(r#"say "hi" \o/"#).unwrap();
        assert_eq!(cmd.as_str(), r#"tellraw @a "say \"hi\" \\o/""#);
    }

    #[test]
    fn test_broadcast_escapes_newlines() {
        let cmd = Command::broadcast("line one\nop Mallory").unwrap();
        assert_eq!(cmd.as_str(), r#"tellraw @a "line one\nop Mallory""#);
    }

    #[test]
    fn test_broadcast_rejects_blank() {
        assert!(Command::broadcast("   ").is_err());
    }

    #[test]
    fn test_say_keeps_spaces() {
        let cmd = Command::say("Server will restart in 10 seconds.").unwrap();
        assert_eq!(cmd.as_str(), "say Server will restart in 10 seconds.");
    }

    #[test]
    fn test_kick_without_reason_has_no_trailing_space() {
        let cmd = Command::kick("Grief3r", None).unwrap();
        assert_eq!(cmd.as_str(), "kick Grief3r");
    }

    #[test]
    fn test_kick_with_reason() {
        let cmd = Command::kick("Grief3r", Some("breaking spawn")).unwrap();
        assert_eq!(cmd.as_str(), "kick Grief3r breaking spawn");
    }

    #[test]
    fn test_kick_blank_reason_is_omitted() {
        let cmd = Command::kick("Steve", Some("  ")).unwrap();
        assert_eq!(cmd.as_str(), "kick Steve");
    }

    #[test]
    fn test_ban_with_and_without_reason() {
        assert_eq!(Command::ban("Steve", None).unwrap().as_str(), "ban Steve");
        assert_eq!(
            Command::ban("Steve", Some("x-ray")).unwrap().as_str(),
            "ban Steve x-ray"
        );
    }

    #[test]
    fn test_ban_ip_and_pardon_ip() {
        assert_eq!(
            Command::ban_ip("10.0.0.7", Some("bots")).unwrap().as_str(),
            "ban-ip 10.0.0.7 bots"
        );
        assert_eq!(
            Command::pardon_ip("10.0.0.7").unwrap().as_str(),
            "pardon-ip 10.0.0.7"
        );
    }

    #[test]
    fn test_pardon_op_deop() {
        assert_eq!(Command::pardon("Steve").unwrap().as_str(), "pardon Steve");
        assert_eq!(Command::op("Alex").unwrap().as_str(), "op Alex");
        assert_eq!(Command::deop("Alex").unwrap().as_str(), "deop Alex");
    }

    #[test]
    fn test_teleport_to_player() {
        let cmd = Command::teleport("Steve", "Alex").unwrap();
        assert_eq!(cmd.as_str(), "tp Steve Alex");
    }

    #[test]
    fn test_teleport_to_coordinates_normalises_spacing() {
        let cmd = Command::teleport("@p", " 100   64 ~-20 ").unwrap();
        assert_eq!(cmd.as_str(), "tp @p 100 64 ~-20");
    }

    #[test]
    fn test_teleport_rejects_too_many_parts() {
        assert!(Command::teleport("Steve", "1 2 3 4").is_err());
    }

    #[test]
    fn test_give_with_amount() {
        let cmd = Command::give("Steve", "diamond", Some(5)).unwrap();
        assert_eq!(cmd.as_str(), "give Steve diamond 5");
    }

    #[test]
    fn test_give_without_amount() {
        let cmd = Command::give("Steve", "minecraft:torch", None).unwrap();
        assert_eq!(cmd.as_str(), "give Steve minecraft:torch");
    }

    #[test]
    fn test_give_rejects_zero_amount() {
        let err = Command::give("Steve", "diamond", Some(0)).unwrap_err();
        assert_eq!(err.argument, "amount");
    }

    #[test]
    fn test_weather_and_time() {
        assert_eq!(Command::weather(Weather::Clear).as_str(), "weather clear");
        assert_eq!(Command::weather(Weather::Rain).as_str(), "weather rain");
        assert_eq!(Command::weather(Weather::Thunder).as_str(), "weather thunder");
        assert_eq!(Command::time(TimeSetting::Day).as_str(), "time set day");
        assert_eq!(Command::time(TimeSetting::Night).as_str(), "time set night");
        assert_eq!(Command::time(TimeSetting::Ticks(6000)).as_str(), "time set 6000");
    }

    #[test]
    fn test_gamemode_puts_mode_before_player() {
        let cmd = Command::gamemode("Steve", GameMode::Creative).unwrap();
        assert_eq!(cmd.as_str(), "gamemode creative Steve");
        let cmd = Command::gamemode("Steve", GameMode::Spectator).unwrap();
        assert_eq!(cmd.as_str(), "gamemode spectator Steve");
    }

    #[test]
    fn test_whitelist_templates() {
        let add = WhitelistAction::Add("Steve".into());
        assert_eq!(Command::whitelist(&add).unwrap().as_str(), "whitelist add Steve");
        let remove = WhitelistAction::Remove("Steve".into());
        assert_eq!(
            Command::whitelist(&remove).unwrap().as_str(),
            "whitelist remove Steve"
        );
        for (action, text) in [
            (WhitelistAction::List, "whitelist list"),
            (WhitelistAction::On, "whitelist on"),
            (WhitelistAction::Off, "whitelist off"),
            (WhitelistAction::Reload, "whitelist reload"),
        ] {
            assert_eq!(Command::whitelist(&action).unwrap().as_str(), text);
        }
    }

    #[test]
    fn test_list_and_raw() {
        assert_eq!(Command::list().as_str(), "list");
        let raw = Command::raw("difficulty peaceful").unwrap();
        assert_eq!(raw.as_str(), "difficulty peaceful");
    }

    #[test]
    fn test_raw_is_not_trimmed_or_templated() {
        let raw = Command::raw(" say  \"quoted\" ").unwrap();
        assert_eq!(raw.as_str(), " say  \"quoted\" ");
    }

    #[test]
    fn test_raw_rejects_blank() {
        assert!(Command::raw("").is_err());
        assert!(Command::raw("  ").is_err());
    }

    // =====================================================================
    // Validation
    // =====================================================================

    #[test]
    fn test_player_with_space_is_rejected() {
        let err = Command::kick("Steve op Mallory", None).unwrap_err();
        assert_eq!(err.argument, "player");
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_player_with_quote_is_rejected() {
        assert!(Command::pardon("Ste\"ve").is_err());
        assert!(Command::op("a\\b").is_err());
    }

    #[test]
    fn test_reason_with_newline_is_rejected() {
        let err = Command::ban("Steve", Some("bye\nop Mallory")).unwrap_err();
        assert_eq!(err.argument, "reason");
    }

    #[test]
    fn test_empty_player_is_rejected() {
        assert!(Command::gamemode("", GameMode::Survival).is_err());
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_from_tokens() {
        let cmd = Command::kick(" Steve ", None).unwrap();
        assert_eq!(cmd.as_str(), "kick Steve");
    }

    #[test]
    fn test_command_over_limit_is_rejected() {
        let reason = "x".repeat(MAX_COMMAND_BYTES);
        let err = Command::kick("Steve", Some(&reason)).unwrap_err();
        assert_eq!(err.argument, "command");
    }

    #[test]
    fn test_keyword() {
        assert_eq!(Command::kick("Steve", Some("afk")).unwrap().keyword(), "kick");
        assert_eq!(Command::broadcast("hi").unwrap().keyword(), "tellraw");
    }

    // =====================================================================
    // Typed arguments
    // =====================================================================

    #[test]
    fn test_whitelist_from_parts() {
        assert_eq!(
            WhitelistAction::from_parts(WhitelistVerb::Add, Some("Steve")).unwrap(),
            WhitelistAction::Add("Steve".into())
        );
        assert_eq!(
            WhitelistAction::from_parts(WhitelistVerb::On, Some("")).unwrap(),
            WhitelistAction::On
        );
        assert!(WhitelistAction::from_parts(WhitelistVerb::Remove, None).is_err());
        assert!(WhitelistAction::from_parts(WhitelistVerb::Reload, Some("Steve")).is_err());
    }

    #[test]
    fn test_time_setting_deserializes_names_and_ticks() {
        let day: TimeSetting = serde_json::from_str(r#""day""#).unwrap();
        let night: TimeSetting = serde_json::from_str(r#""night""#).unwrap();
        let ticks: TimeSetting = serde_json::from_str("18000").unwrap();
        assert_eq!(day, TimeSetting::Day);
        assert_eq!(night, TimeSetting::Night);
        assert_eq!(ticks, TimeSetting::Ticks(18000));
        assert!(serde_json::from_str::<TimeSetting>(r#""noon""#).is_err());
        assert!(serde_json::from_str::<TimeSetting>("-5").is_err());
    }

    #[test]
    fn test_enums_deserialize_lowercase() {
        let mode: GameMode = serde_json::from_str(r#""adventure""#).unwrap();
        let weather: Weather = serde_json::from_str(r#""thunder""#).unwrap();
        let verb: WhitelistVerb = serde_json::from_str(r#""reload""#).unwrap();
        assert_eq!(mode, GameMode::Adventure);
        assert_eq!(weather, Weather::Thunder);
        assert_eq!(verb, WhitelistVerb::Reload);
    }
}
