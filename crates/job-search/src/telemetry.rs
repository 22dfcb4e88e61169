//! Log subscriber for the search service and CLI.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Dependencies that are chatty at `debug` and below; capped unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "axum_prometheus=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    InvalidDirective { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidDirective { directive, .. } => {
                write!(f, "APP_LOG_LEVEL directive '{directive}' is not a valid log filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "job search logging was already initialized: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidDirective { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins when it parses. Otherwise the configured level applies,
/// with noisy dependencies held at `warn`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = config.log_level.trim();
    let directives = std::iter::once(level)
        .chain(QUIET_DEPENDENCIES.iter().copied())
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidDirective {
        directive: level.to_string(),
        source,
    })
}

/// Installs a compact, uncolored subscriber for the whole process.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}
