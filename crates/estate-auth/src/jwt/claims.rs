//! JWT claims structure shared by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estate_entity::token::TokenType;
use estate_entity::user::UserRole;

/// JWT claims payload embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    /// User id at issue time.
    pub uid: Uuid,
    /// User role at issue time.
    pub role: UserRole,
    /// Access or refresh.
    #[serde(rename = "tokenType")]
    pub token_type: TokenType,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id; keeps two tokens issued in the same second distinct.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the subject email.
    pub fn email(&self) -> &str {
        &self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks whether this token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
