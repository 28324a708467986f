//! Unified application error types for the gateway.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The HTTP boundary turns an error into
//! a status code through [`AppError::status_class`]; the core itself stays
//! transport-agnostic.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A transport or URL error occurred while acquiring a portal session.
    AcquisitionFailed,
    /// The portal rejected the supplied credentials.
    LoginFailed,
    /// A bearer token failed its signature, issuer, or format check.
    InvalidToken,
    /// An encrypted field could not be decrypted (wrong key or tampering).
    DecryptionFailed,
    /// A coalesced session refresh failed.
    RefreshFailed,
    /// A remote page fetch or its extraction failed.
    FetchFailed,
    /// Caller input was malformed.
    Validation,
    /// The requested records do not exist.
    NotFound,
    /// A configuration or key-material error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// The transport-agnostic response class for this kind.
    ///
    /// `RefreshFailed` has no class of its own; [`AppError::status_class`]
    /// resolves it through the wrapped cause.
    pub fn status_class(self) -> StatusClass {
        match self {
            Self::LoginFailed | Self::InvalidToken | Self::DecryptionFailed => {
                StatusClass::Unauthorized
            }
            Self::AcquisitionFailed | Self::FetchFailed | Self::RefreshFailed => {
                StatusClass::ServiceUnavailable
            }
            Self::Validation => StatusClass::BadRequest,
            Self::NotFound => StatusClass::NotFound,
            Self::Configuration | Self::Serialization | Self::Internal => StatusClass::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcquisitionFailed => write!(f, "ACQUISITION_FAILED"),
            Self::LoginFailed => write!(f, "LOGIN_FAILED"),
            Self::InvalidToken => write!(f, "INVALID_TOKEN"),
            Self::DecryptionFailed => write!(f, "DECRYPTION_FAILED"),
            Self::RefreshFailed => write!(f, "REFRESH_FAILED"),
            Self::FetchFailed => write!(f, "FETCH_FAILED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Response class the boundary layer maps to a concrete status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StatusClass {
    /// 401-class.
    Unauthorized,
    /// 400-class.
    BadRequest,
    /// 404-class.
    NotFound,
    /// 503-class.
    ServiceUnavailable,
    /// 500-class.
    Internal,
}

/// The unified application error used throughout the gateway.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Kind of the wrapped failure, set for `RefreshFailed`.
    pub cause: Option<ErrorKind>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an acquisition (transport) error.
    pub fn acquisition_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AcquisitionFailed, message)
    }

    /// Create a rejected-credentials error.
    pub fn login_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LoginFailed, message)
    }

    /// Create an invalid-token error.
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    /// Create a decryption error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecryptionFailed, message)
    }

    /// Wrap a failed refresh, keeping the original kind and message.
    pub fn refresh_failed(inner: AppError) -> Self {
        let cause = match inner.kind {
            ErrorKind::RefreshFailed => inner.cause,
            kind => Some(kind),
        };
        Self {
            kind: ErrorKind::RefreshFailed,
            message: inner.message.clone(),
            cause,
            source: Some(Box::new(inner)),
        }
    }

    /// Create a fetch error.
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FetchFailed, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// The kind that actually failed: the wrapped cause for refresh errors,
    /// otherwise [`AppError::kind`].
    pub fn root_kind(&self) -> ErrorKind {
        self.cause.unwrap_or(self.kind)
    }

    /// Response class for this error.
    pub fn status_class(&self) -> StatusClass {
        self.root_kind().status_class()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            cause: self.cause,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
