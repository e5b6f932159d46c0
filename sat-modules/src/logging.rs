use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);

/// Keeps the file writer flushing until dropped
#[allow(dead_code)]
pub struct LoggerGuard(Option<WorkerGuard>);

/// Map a configured level name to a filter; unknown names yield `None`
fn parse_level(level: &str) -> Option<LevelFilter> {
    match level {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}

/// Log to stdout and to a daily-rotated file in `log_dir`
///
/// `RUST_LOG` refines the configured level. If the log directory cannot be
/// used, logging continues on stdout only.
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> LoggerGuard {
    let log_dir = log_dir.as_ref();
    let default_level = parse_level(level);

    let builder = EnvFilter::builder()
        .with_default_directive(default_level.unwrap_or(LevelFilter::INFO).into());

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = fs::create_dir_all(log_dir)
        .map_err(|e| e.to_string())
        .and_then(|_| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .build(log_dir)
                .map_err(|e| e.to_string())
        });

    let (file_layer, guard, file_error) = match file_appender {
        Ok(appender) => {
            let (non_blocking, guard) = NonBlocking::new(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if default_level.is_none() {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    match file_error {
        Some(e) => tracing::warn!("File logging disabled, cannot use {:?}: {}", log_dir, e),
        None => {
            if let Err(e) = cleanup_old_logs(log_dir, prefix, MAX_LOG_AGE) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
        }
    }

    LoggerGuard(guard)
}

fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.starts_with(prefix) && file_name.ends_with(".log") {
                let modified = fs::metadata(&path)?.modified()?;
                if now.duration_since(modified).unwrap_or_default() > max_age {
                    fs::remove_file(&path)?;
                    deleted += 1;
                    tracing::info!("Old log file deleted: {}", file_name);
                }
            }
        }
    }
    Ok(deleted)
}
