//! Unified application error types.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Authentication and authorization
//! outcomes are classified by [`AuthFailure`] before they are folded into
//! an `AppError`, so the precise cause stays available to logs and tests
//! while the HTTP layer only ever reveals the coarse kind.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Credentials were presented and did not match.
    Unauthorized,
    /// The caller is anonymous, wrongly authenticated, or lacks the role.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry).
    Conflict,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A backing store is temporarily unavailable (timeout, lost connection).
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// Every way an authentication or authorization step can fail.
///
/// None of these are retried internally; each one ends the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AuthFailure {
    /// No bearer token (or a garbled Authorization header) on a protected route.
    #[error("missing bearer token")]
    MissingToken,
    /// The token is malformed or its signature does not verify.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The token verified but is absent from the ledger.
    #[error("token is not recognized")]
    TokenNotRecognized,
    /// The ledger marks the token as revoked.
    #[error("token has been revoked")]
    TokenRevoked,
    /// The embedded or ledger expiry has passed.
    #[error("token has expired")]
    TokenExpired,
    /// An access token was required and a refresh token was presented, or vice versa.
    #[error("wrong token type")]
    WrongTokenType,
    /// The account is banned until a time in the future.
    #[error("account is banned")]
    AccountBanned,
    /// Unknown email or password mismatch.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The email is already registered.
    #[error("email is already registered")]
    DuplicateIdentity,
    /// A token string collided with an existing ledger row.
    #[error("token already exists in the ledger")]
    DuplicateToken,
    /// The bound identity does not satisfy the route's role requirement.
    #[error("insufficient role")]
    InsufficientRole,
}

impl AuthFailure {
    /// The error kind this failure is surfaced as.
    ///
    /// Every token-validity and role failure collapses into `Forbidden` so the
    /// response never discloses which check rejected the request.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateIdentity => ErrorKind::Conflict,
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::DuplicateToken => ErrorKind::Internal,
            _ => ErrorKind::Forbidden,
        }
    }
}

/// The unified application error.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// The authentication failure this error was built from, if any.
    pub auth_failure: Option<AuthFailure>,
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
            auth_failure: None,
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
            auth_failure: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Whether this error came from a specific authentication failure.
    pub fn is_auth_failure(&self, failure: AuthFailure) -> bool {
        self.auth_failure == Some(failure)
    }

    /// Whether the caller may safely retry (store-layer transient failures).
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::ServiceUnavailable | ErrorKind::Database)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            auth_failure: self.auth_failure,
            source: None,
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        Self {
            kind: failure.kind(),
            message: failure.to_string(),
            auth_failure: Some(failure),
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

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
