//! Token ledger entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::TokenType;

/// One issued token string and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Ledger row identifier.
    pub id: Uuid,
    /// The exact signed token string; unique across the ledger.
    pub token: String,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Once true, never false again.
    pub revoked: bool,
    /// Owning user.
    pub user_id: Uuid,
    /// Issue time.
    pub created_at: DateTime<Utc>,
    /// Expiry recorded at issue time.
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Whether the entry has passed its recorded expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Not revoked and not expired.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired_at(now)
    }
}

/// A token about to be recorded in the ledger.
#[derive(Debug, Clone)]
pub struct NewToken {
    /// Signed token string.
    pub token: String,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Owning user.
    pub user_id: Uuid,
    /// Expiry taken from the signed claims.
    pub expires_at: DateTime<Utc>,
}
