//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use estate_core::config::AuthConfig;
use estate_core::error::AppError;
use estate_entity::token::{NewToken, TokenType};
use estate_entity::user::User;

use super::claims::Claims;

/// Creates signed HS256 access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// One signed token and the expiry it carries.
#[derive(Debug, Clone)]
pub struct SignedToken {
    /// The compact JWS string.
    pub token: String,
    /// Access or refresh.
    pub token_type: TokenType,
    /// Embedded expiry.
    pub expires_at: DateTime<Utc>,
}

impl SignedToken {
    /// Ledger row for this token, owned by `user_id`.
    pub fn to_ledger_entry(&self, user_id: Uuid) -> NewToken {
        NewToken {
            token: self.token.clone(),
            token_type: self.token_type,
            user_id,
            expires_at: self.expires_at,
        }
    }
}

/// A freshly signed access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: SignedToken,
    /// Long-lived refresh token.
    pub refresh: SignedToken,
}

impl TokenPair {
    /// Ledger rows for both halves of the pair.
    pub fn ledger_entries(&self, user_id: Uuid) -> [NewToken; 2] {
        [
            self.access.to_ledger_entry(user_id),
            self.refresh.to_ledger_entry(user_id),
        ]
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let access_minutes = i64::try_from(config.jwt_access_ttl_minutes).unwrap_or(i64::MAX);
        let refresh_hours = i64::try_from(config.jwt_refresh_ttl_hours).unwrap_or(i64::MAX);
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::try_minutes(access_minutes).unwrap_or(Duration::MAX),
            refresh_ttl: Duration::try_hours(refresh_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Signs a single token of `token_type` for `user`.
    pub fn sign(
        &self,
        user: &User,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, AppError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal("Token expiry overflows"))?;

        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id,
            role: user.role,
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal(format!("Failed to encode {token_type} token: {e}"))
        })?;

        Ok(SignedToken {
            token,
            token_type,
            expires_at,
        })
    }

    /// Signs a new access + refresh pair for `user`.
    pub fn sign_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.sign(user, TokenType::Access, now)?,
            refresh: self.sign(user, TokenType::Refresh, now)?,
        })
    }
}
