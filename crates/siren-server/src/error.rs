//! Error types for the server binary.
//!
//! [`AppError`] wraps every failure that can stop startup or serving so
//! `main` can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: siren_core::ConfigError,
    },

    /// An upstream client could not be built.
    #[error("upstream client error: {source}")]
    Upstream {
        /// The underlying routing error.
        #[from]
        source: siren_routing::RoutingError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: siren_api::ServerError,
    },

    /// The log filter directive was invalid.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
