use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::DEFAULT_LOG_FILTER;
use crate::util::env::{Env, LogFormat};

pub type Result<T> = core::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Installs the global subscriber for an embedding process. `RUST_LOG` wins over the
/// configured filter when set.
pub fn init_subscriber(env: &Env) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(env.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match env.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .try_init()?,
    }

    tracing::debug!(format = ?env.log_format, "tracing subscriber installed");
    Ok(())
}
