//! Persistent file logging.
//!
//! The live event feed (see [`crate::events`]) is duplicate-suppressed and
//! ephemeral; the log file is neither. Every line the runner emits is also
//! recorded through `tracing`, and this module wires those records into an
//! append-only file with timestamp and severity.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "installer.log";

/// Install a global `tracing` subscriber writing to `dir/file_name`.
///
/// The file is appended to, never rotated or truncated. Returns the flush
/// guard for the non-blocking writer; keep it alive for the lifetime of the
/// application or trailing log lines are lost on exit.
///
/// The filter honors `RUST_LOG` and defaults to `silent_setup=info`.
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use silent_setup::logging;
///
/// let _guard = logging::init_file_log(".", logging::DEFAULT_LOG_FILE)
///     .expect("subscriber already installed");
/// tracing::info!("runner starting");
/// ```
pub fn init_file_log(
    dir: impl AsRef<Path>,
    file_name: &str,
) -> Result<WorkerGuard, tracing_subscriber::util::TryInitError> {
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("silent_setup=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();

        // The global subscriber can only be installed once per process; a
        // second call must fail rather than panic.
        match init_file_log(dir.path(), DEFAULT_LOG_FILE) {
            Ok(guard) => {
                tracing::info!("log line for the file");
                drop(guard);
                let contents =
                    std::fs::read_to_string(dir.path().join(DEFAULT_LOG_FILE)).unwrap();
                assert!(contents.contains("log line for the file"));
                assert!(contents.contains("INFO"));
            }
            Err(_) => {
                // Another test installed a subscriber first; nothing to assert.
            }
        }
    }

    #[test]
    fn test_second_init_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let first = init_file_log(dir.path(), "a.log");
        let second = init_file_log(dir.path(), "b.log");
        // Whichever call lost the race, exactly one global subscriber exists.
        assert!(first.is_ok() || second.is_err());
    }
}
