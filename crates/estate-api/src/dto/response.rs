//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estate_auth::IssuedSession;
use estate_entity::user::{User, UserRole};

/// A freshly issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
}

impl From<IssuedSession> for AuthenticationResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            access_token: session.tokens.access.token,
            refresh_token: session.tokens.refresh.token,
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    pub mobile_number: String,
    /// Role.
    pub role: UserRole,
    /// End of the current ban, if any.
    pub banned_till: Option<DateTime<Utc>>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            mobile_number: u.mobile_number,
            role: u.role,
            banned_till: u.banned_till,
            created_at: u.created_at,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// What happened.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `"connected"`, `"unavailable"`, or `"memory"`.
    pub database: String,
}
