// Debug logging for Breakout Duel
// The TUI owns the terminal, so tracing output goes to a file enabled via --debug

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PATH: &str = "/tmp/breakout-duel-debug.log";

const DEFAULT_FILTER: &str = "breakout_duel=debug";

/// Install the tracing subscriber
///
/// # Behavior
/// - If enabled=false: Returns immediately, no file created, tracing events are dropped
/// - If enabled=true: Creates/truncates the log file, writes a header and routes
///   all tracing output there (filter from RUST_LOG, default `breakout_duel=debug`)
pub fn init(enabled: bool) -> anyhow::Result<()> {
    if !enabled {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_FILE_PATH)
        .with_context(|| format!("failed to open {LOG_FILE_PATH}"))?;

    writeln!(file, "=== Breakout Duel Debug Log ===")?;
    writeln!(file, "Session started: {:?}", SystemTime::now())?;
    writeln!(file, "To monitor: tail -f {}", LOG_FILE_PATH)?;
    writeln!(file, "========================================\n")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
