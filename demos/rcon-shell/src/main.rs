//! Interactive remote console.
//!
//! Reads one command per line from stdin, runs it against the server named
//! by the `RCON_*` environment variables, and prints the outcome as JSON:
//!
//! ```text
//! $ RCON_HOST=localhost RCON_PORT=25575 RCON_PASSWORD=... rcon-shell
//! list
//! {"success":true,"message":"There are 0 of a max of 20 players online: "}
//! exit
//! ```

use rconsole::actions::{self, RawCommandArgs};
use rconsole::logging::{DEFAULT_FILTER, init_logging};
use rconsole::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Skip,
    Exit,
    Command(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Skip,
        "exit" | "quit" => Input::Exit,
        command => Input::Command(command),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_FILTER)?;

    let config = Config::from_env()?;
    tracing::info!(endpoint = %config.credentials.endpoint(), "starting rcon shell");
    let console = Console::from_config(TcpTransport, config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match classify(&line) {
            Input::Skip => continue,
            Input::Exit => break,
            Input::Command(command) => command,
        };
        let args = RawCommandArgs {
            command: command.to_string(),
        };
        let result = actions::execute_raw_command(&console, args).await;
        println!("{}", serde_json::to_string(&result)?);
    }

    console.shutdown().await;
    Ok(())
}
