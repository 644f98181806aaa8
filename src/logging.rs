//! Tracing setup.
//!
//! The wizard draws over the whole terminal, so its events go to a
//! per-session file under `<state>/logs/`. The one-shot commands print to
//! stderr instead.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the file writer alive; dropping it flushes what is still buffered.
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,

    /// Set when events go to a file
    pub log_file_path: Option<PathBuf>,
}

/// Where events end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogSink {
    File,
    Stderr,
}

fn sink_for(config: &Config, is_tui_mode: bool) -> LogSink {
    if is_tui_mode && config.logging.to_file {
        LogSink::File
    } else {
        LogSink::Stderr
    }
}

/// Filter directive: `RUST_LOG` wins, then `--debug`, then the config level
fn filter_directive(config: &Config, debug_override: bool, rust_log: Option<String>) -> String {
    rust_log.unwrap_or_else(|| {
        if debug_override {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    })
}

/// `inquiry-<UTC timestamp>.log`
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("inquiry-{}.log", timestamp)
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let directive = filter_directive(config, debug_override, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::new(directive);

    match sink_for(config, is_tui_mode) {
        LogSink::File => {
            let dir = config.logs_path();
            std::fs::create_dir_all(&dir)?;
            let name = log_file_name();
            let path = dir.join(&name);

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, &name));
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();

            Ok(LoggingHandle {
                _guard: Some(guard),
                log_file_path: Some(path),
            })
        }
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();

            Ok(LoggingHandle {
                _guard: None,
                log_file_path: None,
            })
        }
    }
}
