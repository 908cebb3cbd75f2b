use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_PREFIX: &str = "catalog-browser";

/// Install file logging. The returned guard must be held for the lifetime of
/// the program or buffered lines are lost.
///
/// `RUST_LOG` takes precedence over `default_filter`. The terminal owns
/// stdout, so nothing is written there. When `log_dir` cannot be created or
/// written, the program runs without a log file and `None` is returned.
pub fn init(log_dir: &Path, default_filter: &str) -> Option<WorkerGuard> {
    let (file_layer, guard) = match file_appender(log_dir) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true);
            (Some(layer), Some(guard))
        }
        Err(details) => {
            eprintln!("file logging disabled: {details}");
            (None, None)
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    guard
}

/// Daily-rolling appender writing `catalog-browser.<date>.log` under `log_dir`.
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, String> {
    fs::create_dir_all(log_dir).map_err(|e| format!("{}: {e}", log_dir.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| format!("{}: {e}", log_dir.display()))
}
