//! Shared error type across tally crates.

use thiserror::Error;

use crate::metric::MetricKind;

/// Stable error codes, independent of message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Metric key could not be built.
    InvalidKey,
    /// Malformed management object name.
    InvalidObjectName,
    /// A key is already taken by a different metric kind.
    KindMismatch,
    /// Configuration rejected.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidKey => "INVALID_KEY",
            ErrorCode::InvalidObjectName => "INVALID_OBJECT_NAME",
            ErrorCode::KindMismatch => "KIND_MISMATCH",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Unified error type used by core and registry.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("invalid metric key: {0}")]
    InvalidKey(String),
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),
    #[error("{key} is registered as a {found}, not a {expected}")]
    KindMismatch {
        key: String,
        expected: MetricKind,
        found: MetricKind,
    },
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TallyError::InvalidKey(_) => ErrorCode::InvalidKey,
            TallyError::InvalidObjectName(_) => ErrorCode::InvalidObjectName,
            TallyError::KindMismatch { .. } => ErrorCode::KindMismatch,
            TallyError::BadConfig(_) => ErrorCode::BadConfig,
            TallyError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            TallyError::Internal(_) => ErrorCode::Internal,
        }
    }
}
