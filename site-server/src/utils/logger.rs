//! Logging Infrastructure
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional daily rolling file output
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("site_server={level},shared={level},tower_http={level}"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, "site-server");
                let _ = subscriber
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Cannot create log dir {dir}: {e}, logging to stdout"),
        }
    }

    let _ = subscriber.try_init();
}
