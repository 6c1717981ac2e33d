//! Shared error type across webMetrics crates.

use thiserror::Error;

/// Stable short codes for errors (log/test friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected configuration.
    InvalidConfig,
    /// A decorated response failed to forward a call.
    Response,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::Response => "RESPONSE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WebMetricsError>;

/// Unified error type used by core and gateway.
///
/// Downstream handler failures never end up here: the middleware hands them
/// back to the caller as-is.
#[derive(Debug, Error)]
pub enum WebMetricsError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("response: {0}")]
    Response(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl WebMetricsError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebMetricsError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            WebMetricsError::Response(_) => ErrorKind::Response,
            WebMetricsError::Internal(_) => ErrorKind::Internal,
        }
    }
}
