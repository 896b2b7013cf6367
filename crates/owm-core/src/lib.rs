pub mod config;
pub mod error;

pub use config::{
    ApiConfig, CitiesConfig, Config, QueryConfig, ValidationResult, API_KEY_ENV,
    DEFAULT_CITY_LIST_URL,
};
pub use error::{AppError, CityDataError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging to stderr, filtered by `RUST_LOG` (default `info`)
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("OWM core initialized");
    Ok(())
}
