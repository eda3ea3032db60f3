//! Logging setup
//!
//! Human-readable output on stderr, plus JSON lines in a daily rolling file
//! when `LOG_DIR` is set.

use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "info,mclog_notifier=debug";
const LOG_FILE_PREFIX: &str = "mclog-notifier.log";

/// Keeps the non-blocking log writers alive.
///
/// Hold it in `main`; buffered lines are flushed when it drops, on every exit path.
#[must_use = "dropping the guard stops log output"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

/// Initialize the tracing subscriber.
///
/// Log level comes from `RUST_LOG`, defaulting to `info,mclog_notifier=debug`.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging() -> LogGuard {
    let mut guards = Vec::new();

    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(stderr_guard);

    let stderr_layer = fmt::layer()
        .with_timer(UtcTime::new(Rfc3339))
        .with_writer(stderr_writer);

    let file_layer = std::env::var("LOG_DIR")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(|log_dir| {
            let file_appender = rolling::daily(&log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            guards.push(guard);

            fmt::layer()
                .json()
                .with_timer(UtcTime::new(Rfc3339))
                .with_current_span(true)
                .flatten_event(false)
                .with_ansi(false)
                .with_writer(non_blocking)
        });

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        use std::error::Error;
        let already_set = err
            .source()
            .and_then(|s| s.downcast_ref::<tracing::dispatcher::SetGlobalDefaultError>())
            .is_some();
        if !already_set {
            eprintln!("Failed to initialize tracing: {}", err);
        }
    }

    LogGuard { _guards: guards }
}
