//! Diagnostic output on stderr

use jbridge_core::LogLevel;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to every target.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(convert_level_to_filter(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    // Ignore error if already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Convert LogLevel to tracing LevelFilter
fn convert_level_to_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
