use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is unset
const DEFAULT_FILTER: &str = "tomate=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr, for the plain CLI subcommands
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Discard log output, for `--ephemeral` runs that must not touch disk
pub fn init_discard() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::sink)
        .init();
}

/// Log to a file while the TUI owns the terminal
///
/// The returned guard flushes pending lines on drop; keep it alive for the
/// whole run.
pub fn init_file(log_path: &Path) -> Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .context("Log path has no parent directory")?;
    let file_name = log_path
        .file_name()
        .context("Log path has no file name")?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
