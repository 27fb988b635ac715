//! Configuration loading and typed config structures for the dispatch service.
//!
//! The canonical configuration lives in `siren-config.yaml` next to the
//! binary. This module defines strongly-typed structs that mirror the YAML
//! structure and provides a loader that reads the file and applies
//! environment overrides on top.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {message}")]
    Env {
        /// The environment variable name.
        name: String,
        /// What was wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `siren-config.yaml`. Every section is
/// optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SirenConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// External routing service.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// External geocoding service.
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Realtime fan-out channel.
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Lane configuration output for the vehicle-counting service.
    #[serde(default)]
    pub lanes: LanesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SirenConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values, see
    /// [`SirenConfig::apply_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Env`] if an override is malformed.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognised variables:
    /// - `HOST` overrides `server.host`
    /// - `PORT` overrides `server.port`
    /// - `ROUTING_BASE_URL` overrides `routing.base_url`
    /// - `GEOCODING_BASE_URL` overrides `geocoding.base_url`
    /// - `LANE_CONFIG_PATH` overrides `lanes.config_path`
    /// - `LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `PORT` is not a valid port number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("PORT") {
            self.server.port = val.trim().parse().map_err(|e| ConfigError::Env {
                name: "PORT".to_owned(),
                message: format!("{val:?}: {e}"),
            })?;
        }
        if let Some(val) = lookup("ROUTING_BASE_URL") {
            self.routing.base_url = val;
        }
        if let Some(val) = lookup("GEOCODING_BASE_URL") {
            self.geocoding.base_url = val;
        }
        if let Some(val) = lookup("LANE_CONFIG_PATH") {
            self.lanes.config_path = val;
        }
        if let Some(val) = lookup("LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// External routing service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the OSRM-compatible routing service.
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// Routing profile path segment.
    #[serde(default = "default_routing_profile")]
    pub profile: String,

    /// Upper bound on a single upstream call, in milliseconds.
    #[serde(default = "default_routing_timeout_ms")]
    pub timeout_ms: u64,

    /// Great-circle distance above which requests are refused without
    /// contacting the upstream, in kilometres.
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,

    /// `User-Agent` header sent upstream.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            profile: default_routing_profile(),
            timeout_ms: default_routing_timeout_ms(),
            max_distance_km: default_max_distance_km(),
            user_agent: default_user_agent(),
        }
    }
}

/// External geocoding service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible geocoder.
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Upper bound on a single upstream call, in milliseconds.
    #[serde(default = "default_geocoding_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_ms: default_geocoding_timeout_ms(),
        }
    }
}

/// Realtime channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RealtimeConfig {
    /// Events buffered per subscriber before it is considered lagged.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Where lane configurations for the vehicle counter are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanesConfig {
    /// Output JSON file.
    #[serde(default = "default_lane_config_path")]
    pub config_path: String,

    /// Directory holding `lane<N>.jpeg` reference images.
    #[serde(default = "default_lane_image_dir")]
    pub image_dir: String,
}

impl Default for LanesConfig {
    fn default() -> Self {
        Self {
            config_path: default_lane_config_path(),
            image_dir: default_lane_image_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3000
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_owned()
}

fn default_routing_profile() -> String {
    "driving".to_owned()
}

const fn default_routing_timeout_ms() -> u64 {
    30_000
}

const fn default_max_distance_km() -> f64 {
    10_000.0
}

fn default_user_agent() -> String {
    "TrafficManagement/1.0".to_owned()
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_owned()
}

const fn default_geocoding_timeout_ms() -> u64 {
    10_000
}

const fn default_channel_capacity() -> usize {
    256
}

fn default_lane_config_path() -> String {
    "configs/video_configs.json".to_owned()
}

fn default_lane_image_dir() -> String {
    "images".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "text".to_owned()
}
