//! Error taxonomy shared by every layer of the dispatch service.
//!
//! [`ErrorClass`] is the coarse classification the HTTP layer uses to
//! pick a status code and a log level. [`DispatchError`] covers the
//! failures the dispatcher itself can produce.

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed or missing input. Always client-correctable.
    Validation,
    /// The addressed record does not exist.
    NotFound,
    /// An upstream service was unreachable, failed, or timed out.
    UpstreamUnavailable,
    /// An upstream service answered but reported a failure in its body.
    UpstreamLogicalFailure,
    /// An unexpected local or transport failure.
    Internal,
}

impl ErrorClass {
    /// Whether failures of this class are the caller's fault.
    ///
    /// Client-side failures are logged at `warn`; everything else at
    /// `error`.
    pub const fn is_client_side(self) -> bool {
        matches!(self, Self::Validation | Self::NotFound)
    }
}

/// Errors produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The payload failed validation; nothing was stored or broadcast.
    #[error("{0}")]
    Validation(String),

    /// The addressed record does not exist; nothing was broadcast.
    #[error("{0}")]
    NotFound(String),
}

impl DispatchError {
    /// The taxonomy class of this error.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::NotFound(_) => ErrorClass::NotFound,
        }
    }
}
