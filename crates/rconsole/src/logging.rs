//! Tracing subscriber setup for binaries.
//!
//! Library code only emits `tracing` events. Whatever embeds the client
//! calls [`init_logging`] once at startup, or installs its own subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::RconsoleError;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str =
    "rconsole=info,rconsole_session=info,rconsole_transport=warn,rconsole_protocol=warn";

/// Installs a global subscriber writing human-readable lines to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive`. Stdout is left
/// alone so command output stays machine-readable.
///
/// # Errors
/// [`RconsoleError::Logging`] if a global subscriber is already set.
pub fn init_logging(default_directive: &str) -> Result<(), RconsoleError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}
