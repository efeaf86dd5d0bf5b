//! Logging setup shared by every bookline binary and test.
//!
//! All crates log through `tracing`; this module only installs the subscriber.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` overrides `level` when set. Calling this more than once is
/// harmless: later calls leave the first subscriber in place.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", level)));

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parses a configured level name, falling back to INFO.
pub fn level_from_str(level: Option<&str>) -> Level {
    level
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
