//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{AppError, AppResult, config::LoggingConfig};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over [`LoggingConfig::filter`] when set. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    result.map_err(|e| AppError::Internal(format!("failed to install tracing subscriber: {e}")))
}
