//! Tracing subscriber setup.

use tickettao_core::{ConfigError, LogConfig, LogFormat, TicketResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber described by `config`.
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already set. Call once, early in the host process.
pub fn init_tracing(config: &LogConfig) -> TicketResult<()> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|e| ConfigError::InvalidValue {
        field: "log.filter".to_string(),
        value: config.filter.clone(),
        reason: e.to_string(),
    })?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .try_init(),
    };

    installed.map_err(|e| {
        ConfigError::SubscriberInit {
            reason: e.to_string(),
        }
        .into()
    })
}
