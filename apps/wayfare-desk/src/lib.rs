//! # Wayfare Desk Library
//!
//! Host process for the booking engine: reads one JSON command per line
//! on stdin, answers one JSON response per line on stdout.
//!
//! ## Module Organization
//! ```text
//! wayfare_desk/
//! ├── lib.rs            ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs        ◄─── AppState + exports
//! │   ├── config.rs     ◄─── Configuration state
//! │   ├── catalog.rs    ◄─── Inventory catalogs (demo or file)
//! │   └── flow.rs       ◄─── Active booking flow (Arc<Mutex>)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Wire format + dispatch
//! │   ├── flow.rs       ◄─── start / view / confirm / cancel
//! │   ├── selection.rs  ◄─── selection changes
//! │   ├── browse.rs     ◄─── type filter and paging
//! │   ├── discounts.rs  ◄─── manual toggles
//! │   └── config.rs     ◄─── get_config
//! └── error.rs          ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, BufRead, Write};

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::handle_line;
use error::ApiError;
use state::{AppState, CatalogState, ConfigState};

/// Runs the host until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Host Startup                                      │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, writing to stderr             │
/// │     • Default: info, debug for wayfare crates; RUST_LOG                 │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • WAYFARE_* environment variables over defaults                     │
/// │                                                                         │
/// │  3. Load Catalogs ────────────────────────────────────────────────────► │
/// │     • Built-in demo, replaced per kind by WAYFARE_CATALOG_PATH          │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One command per stdin line, one response per stdout line          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting Wayfare booking host");

    let config = ConfigState::from_env();
    info!(
        currency = %config.currency_code,
        page_size = config.page_size,
        tax_rate_bps = config.tax_rate_bps,
        "Configuration loaded"
    );

    let catalogs = CatalogState::load(&config)?;
    let app = AppState::new(config, catalogs);
    info!("State initialized");

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&app, stdin.lock(), stdout.lock())
}

/// Answers every line of `input` on `output` until `input` ends.
///
/// Command failures are answered, not returned; only a broken channel
/// stops the loop.
pub fn serve<R: BufRead, W: Write>(app: &AppState, input: R, mut output: W) -> Result<(), ApiError> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(app, &line, Utc::now());
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    info!("Input closed, shutting down");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=wayfare_core=trace` - Trace the engine only
/// - Default: INFO, DEBUG for wayfare crates
///
/// Logs go to stderr; stdout carries protocol responses only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wayfare_core=debug,wayfare_desk=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    #[test]
    fn test_serve_answers_each_line() {
        let app = AppState::new(ConfigState::default(), CatalogState::demo().unwrap());
        let input = Cursor::new(
            [
                r#"{"command":"start","kind":"ticketed"}"#,
                "",
                r#"{"command":"set_quantity","ticket_id":"child","delta":-3}"#,
                "not json",
                r#"{"command":"cancel"}"#,
            ]
            .join("\n"),
        );
        let mut output = Vec::new();

        serve(&app, input, &mut output).unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].get("ok").is_some());
        assert_eq!(lines[1]["ok"]["selection"]["ticketQuantities"]["child"], 0);
        assert_eq!(lines[2]["error"]["code"], "INVALID_COMMAND");
        assert_eq!(lines[3]["ok"]["cancelled"], true);
    }
}
