use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an `EnvFilter` directive, e.g. `course_planner=debug`.
pub const LOG_ENV: &str = "COURSE_PLANNER_LOG";

static LOGGING_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the stderr subscriber. The first call wins; later calls do nothing.
pub fn init_logging(default_directive: &str) -> Result<(), LoggingError> {
    if LOGGING_INSTALLED.get().is_some() {
        return Ok(());
    }
    let filter = match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::try_new(value.trim())?,
        _ => EnvFilter::try_new(default_directive)?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;
    let _ = LOGGING_INSTALLED.set(());
    Ok(())
}
