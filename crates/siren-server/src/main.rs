//! Server binary for the Siren emergency dispatch service.
//!
//! # Startup Sequence
//!
//! 1. Load `.env` into the process environment, if present
//! 2. Load configuration from `siren-config.yaml` (or `SIREN_CONFIG`)
//! 3. Initialize structured logging (tracing)
//! 4. Build the shared application state
//! 5. Serve HTTP and `WebSocket` traffic until `Ctrl-C`

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use siren_api::{AppState, ServerConfig, start_server};
use siren_core::SirenConfig;
use siren_core::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "siren-config.yaml";

/// Application entry point for the dispatch server.
///
/// # Errors
///
/// Returns an error if configuration, logging, state construction, or
/// the server itself fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. A missing .env file is normal.
    let dotenv = dotenvy::dotenv().ok();

    // 2. Load configuration.
    let (config, config_source) = load_config()?;

    // 3. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!(
        config = %config_source,
        dotenv = dotenv.as_ref().map(|p| p.display().to_string()),
        "siren-server starting"
    );
    info!(
        host = config.server.host,
        port = config.server.port,
        routing = config.routing.base_url,
        geocoding = config.geocoding.base_url,
        lane_config = config.lanes.config_path,
        "Configuration loaded"
    );

    // 4. Build shared state.
    let state = Arc::new(AppState::new(&config)?);

    // 5. Serve.
    start_server(&ServerConfig::from(&config.server), state).await?;

    info!("siren-server stopped");
    Ok(())
}

/// Load configuration from the file named by `SIREN_CONFIG`, else
/// `siren-config.yaml`, else built-in defaults.
fn load_config() -> Result<(SirenConfig, String), AppError> {
    let explicit = std::env::var_os("SIREN_CONFIG").map(PathBuf::from);
    load_config_from(explicit.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
}

/// Load configuration from `explicit` if given, else from `fallback`
/// when that file exists, else from built-in defaults.
///
/// An explicit path must be readable. Only a missing `fallback` drops
/// to defaults. Environment overrides apply in every case. Returns the
/// config and a description of where it came from.
fn load_config_from(
    explicit: Option<&Path>,
    fallback: &Path,
) -> Result<(SirenConfig, String), AppError> {
    let path = match explicit {
        Some(path) => path,
        None if fallback.exists() => fallback,
        None => {
            let mut config = SirenConfig::default();
            config.apply_overrides(|name| std::env::var(name).ok())?;
            return Ok((config, "defaults".to_owned()));
        }
    };
    let config = SirenConfig::from_file(path)?;
    Ok((config, path.display().to_string()))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. `format: json` selects
/// the JSON formatter, anything else the human-readable one.
fn init_tracing(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| AppError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
