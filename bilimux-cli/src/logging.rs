//! Logger initialization for the CLI.
//!
//! Uses the standard `log` facade with `env_logger` as the backend, so
//! the `RUST_LOG` environment variable keeps working:
//! - RUST_LOG=info (default): normal operation logs
//! - RUST_LOG=debug: per-file detail, external command lines
//! - RUST_LOG=trace: very verbose debugging information

use colored::*;
use log::LevelFilter;
use std::io::Write;

/// Initializes the process-wide logger at the default info level.
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Initializes the logger with a specific default level. An explicit
/// `RUST_LOG` value still takes precedence.
pub fn init_with_level(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());

    env_logger::Builder::from_env(env)
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };

            let level_colored = match record.level() {
                log::Level::Error => level_str.bright_red(),
                log::Level::Warn => level_str.yellow(),
                log::Level::Info => level_str.green(),
                log::Level::Debug => level_str.blue(),
                log::Level::Trace => level_str.magenta(),
            };

            writeln!(
                buf,
                "{} {} {}",
                timestamp.to_string().white(),
                level_colored,
                record.args()
            )
        })
        .init();
}

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
