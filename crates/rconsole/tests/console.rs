//! Integration tests for `Console` and the operator actions.
//!
//! A small recording transport stands in for the game server: it answers
//! from a script, fails on demand, and counts connects and closes so the
//! two deployment modes can be told apart.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rconsole::actions::{
    self, GiveItemArgs, MessageArgs, PlayerActionArgs, RawCommandArgs, RestartArgs, TimeArgs,
    WhitelistArgs,
};
use rconsole::protocol::{Command, TimeSetting, WhitelistVerb};
use rconsole::session::{Credentials, SessionConfig};
use rconsole::transport::{Connection, ConnectionId, Endpoint, Transport, TransportError};
use rconsole::{ActionResult, Console, ConsoleMode, RconsoleError};

// =========================================================================
// Recording transport
// =========================================================================

#[derive(Debug, Clone, Copy)]
enum Step {
    Reply(&'static str),
    Fail,
}

#[derive(Debug, Default)]
struct Recorded {
    connects: usize,
    closes: usize,
    sends: Vec<String>,
    script: VecDeque<Step>,
}

#[derive(Clone, Default)]
struct RecordingTransport {
    state: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    fn scripted(steps: impl IntoIterator<Item = Step>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().script.extend(steps);
        fake
    }

    fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    fn sends(&self) -> Vec<String> {
        self.state.lock().unwrap().sends.clone()
    }
}

struct RecordingConnection {
    id: ConnectionId,
    state: Arc<Mutex<Recorded>>,
}

impl Transport for RecordingTransport {
    type Connection = RecordingConnection;

    async fn connect(
        &self,
        _endpoint: &Endpoint,
        _password: &str,
        _timeout: Duration,
    ) -> Result<RecordingConnection, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.connects += 1;
        Ok(RecordingConnection {
            id: ConnectionId::new(state.connects as u64),
            state: Arc::clone(&self.state),
        })
    }
}

impl Connection for RecordingConnection {
    async fn send(&mut self, command: &Command) -> Result<String, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sends.push(command.as_str().to_string());
        match state.script.pop_front().unwrap_or(Step::Reply("ok")) {
            Step::Reply(text) => Ok(text.to_string()),
            Step::Fail => Err(TransportError::ConnectionClosed("scripted failure".into())),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn credentials() -> Credentials {
    Credentials::new("mc.example.net", 25575, "s3cret").expect("valid credentials")
}

fn shared(fake: &RecordingTransport) -> Console<RecordingTransport> {
    Console::new(fake.clone(), credentials(), SessionConfig::default())
}

fn per_call(fake: &RecordingTransport) -> Console<RecordingTransport> {
    Console::new(fake.clone(), credentials(), SessionConfig::per_call())
}

fn player(name: &str) -> PlayerActionArgs {
    PlayerActionArgs {
        player: name.to_string(),
        reason: None,
    }
}

// =========================================================================
// Deployment modes
// =========================================================================

#[tokio::test]
async fn test_mode_follows_reuse_policy() {
    let fake = RecordingTransport::default();
    assert_eq!(shared(&fake).mode(), ConsoleMode::Shared);
    assert_eq!(per_call(&fake).mode(), ConsoleMode::PerCall);
    assert!(per_call(&fake).session_manager().is_none());
}

#[tokio::test]
async fn test_shared_mode_reuses_one_session_until_shutdown() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    console.list_players().await.expect("list");
    console.say("hello").await.expect("say");

    assert_eq!(fake.connects(), 1);
    assert_eq!(fake.closes(), 0);

    console.shutdown().await;
    assert_eq!(fake.closes(), 1);
}

#[tokio::test]
async fn test_per_call_mode_opens_and_closes_every_call() {
    let fake = RecordingTransport::default();
    let console = per_call(&fake);

    console.list_players().await.expect("list");
    console.say("hello").await.expect("say");

    assert_eq!(fake.connects(), 2);
    assert_eq!(fake.closes(), 2);

    console.shutdown().await;
    assert_eq!(fake.closes(), 2);
}

#[tokio::test]
async fn test_per_call_mode_leaves_nothing_open_after_failure() {
    let fake = RecordingTransport::scripted([Step::Fail, Step::Fail]);
    let console = per_call(&fake);

    let err = console.kick("Grief3r", None).await.unwrap_err();

    assert!(matches!(err, RconsoleError::Session(_)));
    assert_eq!(fake.connects(), 2);
    assert_eq!(fake.closes(), 2);
}

// =========================================================================
// Actions
// =========================================================================

#[tokio::test]
async fn test_kick_player_sends_bare_kick_without_reason() {
    let fake = RecordingTransport::scripted([Step::Reply("Kicked Grief3r")]);
    let console = shared(&fake);

    let result = actions::kick_player(&console, player("Grief3r")).await;

    assert_eq!(result, ActionResult::ok("Kicked Grief3r"));
    assert_eq!(fake.sends(), vec!["kick Grief3r"]);
}

#[tokio::test]
async fn test_ban_player_appends_reason() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = PlayerActionArgs {
        player: "Grief3r".into(),
        reason: Some("griefing spawn".into()),
    };
    assert!(actions::ban_player(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec!["ban Grief3r griefing spawn"]);
}

#[tokio::test]
async fn test_give_item_passes_error_like_reply_through_as_success() {
    let fake = RecordingTransport::scripted([Step::Reply("Unknown item 'minecraft:fake'")]);
    let console = shared(&fake);

    let args = GiveItemArgs {
        player: "Steve".into(),
        item: "minecraft:fake".into(),
        amount: Some(1),
    };
    let result = actions::give_item(&console, args).await;

    assert_eq!(result, ActionResult::ok("Unknown item 'minecraft:fake'"));
    assert_eq!(fake.sends(), vec!["give Steve minecraft:fake 1"]);
}

#[tokio::test]
async fn test_raw_command_is_sent_verbatim() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = RawCommandArgs {
        command: "scoreboard players set @a kills 0".into(),
    };
    assert!(actions::execute_raw_command(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec!["scoreboard players set @a kills 0"]);
}

#[tokio::test]
async fn test_change_time_with_ticks() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = TimeArgs {
        setting: TimeSetting::Ticks(6000),
    };
    assert!(actions::change_time(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec!["time set 6000"]);
}

#[tokio::test]
async fn test_get_online_players_returns_raw_list_output() {
    let fake =
        RecordingTransport::scripted([Step::Reply("There are 2 of a max of 20 players online: A, B")]);
    let console = shared(&fake);

    let result = actions::get_online_players(&console).await;

    assert_eq!(
        result.message.as_deref(),
        Some("There are 2 of a max of 20 players online: A, B")
    );
    assert_eq!(fake.sends(), vec!["list"]);
}

// =========================================================================
// Failure mapping
// =========================================================================

#[tokio::test]
async fn test_delivery_failure_maps_to_fixed_message() {
    let fake = RecordingTransport::scripted([Step::Fail, Step::Fail]);
    let console = shared(&fake);

    let result = actions::kick_player(&console, player("Grief3r")).await;

    assert_eq!(result, ActionResult::failed("Failed to kick player"));
    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({"success": false, "error": "Failed to kick player"})
    );
}

#[tokio::test]
async fn test_invalid_argument_is_rejected_before_connecting() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let result = actions::kick_player(&console, player("bad name")).await;

    assert_eq!(result, ActionResult::failed("Failed to kick player"));
    assert_eq!(fake.connects(), 0);
}

#[tokio::test]
async fn test_send_message_rejects_long_messages() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = MessageArgs {
        message: "x".repeat(101),
    };
    let result = actions::send_message(&console, args).await;

    assert_eq!(result, ActionResult::failed("Failed to send message"));
    assert!(fake.sends().is_empty());
}

#[tokio::test]
async fn test_send_message_broadcasts_with_tellraw() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = MessageArgs {
        message: "Backup at midnight".into(),
    };
    assert!(actions::send_message(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec![r#"tellraw @a "Backup at midnight""#]);
}

#[tokio::test]
async fn test_send_message_escapes_quotes() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = MessageArgs {
        message: r#"say "hi" \ bye"#.into(),
    };
    assert!(actions::send_message(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec![r#"tellraw @a "say \"hi\" \\ bye""#]);
}

#[tokio::test]
async fn test_whitelist_add_requires_player() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = WhitelistArgs {
        action: WhitelistVerb::Add,
        player: None,
    };
    let result = actions::manage_whitelist(&console, args).await;

    assert_eq!(result, ActionResult::failed("Failed to manage whitelist"));
    assert_eq!(fake.connects(), 0);
}

#[tokio::test]
async fn test_whitelist_list_ignores_blank_player() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let args = WhitelistArgs {
        action: WhitelistVerb::List,
        player: Some("  ".into()),
    };
    assert!(actions::manage_whitelist(&console, args).await.is_success());
    assert_eq!(fake.sends(), vec!["whitelist list"]);
}

// =========================================================================
// Restart
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_restart_warns_waits_then_restarts() {
    let fake = RecordingTransport::default();
    let console = shared(&fake);

    let started = tokio::time::Instant::now();
    let result = actions::restart_server(&console, RestartArgs::default()).await;

    assert_eq!(result, ActionResult::ok("Server restart initiated successfully"));
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(
        fake.sends(),
        vec![
            "say Server will restart in 10 seconds. Please prepare for disconnection.",
            "restart",
        ]
    );
    assert_eq!(fake.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_is_abandoned_when_warning_fails() {
    let fake = RecordingTransport::scripted([Step::Fail, Step::Fail]);
    let console = shared(&fake);

    let args = RestartArgs {
        warning_seconds: Some(3),
    };
    let result = actions::restart_server(&console, args).await;

    assert_eq!(
        result,
        ActionResult::failed("Failed to restart the server. Please try again later.")
    );
    assert!(!fake.sends().contains(&"restart".to_string()));
}
