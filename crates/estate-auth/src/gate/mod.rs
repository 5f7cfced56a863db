//! Per-request authentication.
//!
//! The gate runs an explicit ordered pipeline: extract the bearer token,
//! verify its signature, check it against the ledger, check its type,
//! resolve its owner. The first failing step ends the pass. Store lookups
//! are time-bounded; a timeout is a transient failure, not a rejection.

pub mod extract;
pub mod pipeline;

use estate_core::error::{AppError, AuthFailure};
use estate_entity::user::User;

use crate::jwt::Claims;

pub use extract::bearer_token;
pub use pipeline::RequestGate;

/// An authenticated caller bound to one request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The resolved account, read fresh from the identity store.
    pub user: User,
    /// Claims decoded from the presented token.
    pub claims: Claims,
    /// The presented token string.
    pub token: String,
}

/// Result of running the gate over one request.
#[derive(Debug, Clone)]
pub enum GateOutcome {
    /// No usable Authorization header.
    Anonymous,
    /// A valid access token bound to a live account.
    Authenticated(Identity),
    /// A token was presented and failed verification.
    Rejected(AuthFailure),
}

impl GateOutcome {
    /// The bound identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Why a token failed to verify.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The token is not acceptable.
    #[error("token rejected: {0}")]
    Rejected(#[from] AuthFailure),
    /// A store lookup failed or timed out.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Rejected(failure) => failure.into(),
            GateError::Store(err) => err,
        }
    }
}
