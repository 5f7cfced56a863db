//! The request gate pipeline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use estate_core::config::AuthConfig;
use estate_core::error::{AppError, AuthFailure};
use estate_core::result::AppResult;
use estate_database::store::{IdentityStore, TokenLedger};
use estate_entity::token::TokenType;

use super::extract::bearer_token;
use super::{GateError, GateOutcome, Identity};
use crate::jwt::JwtDecoder;

/// Verifies presented tokens against the signer, the ledger, and the
/// identity store.
#[derive(Debug, Clone)]
pub struct RequestGate {
    decoder: JwtDecoder,
    identities: Arc<dyn IdentityStore>,
    ledger: Arc<dyn TokenLedger>,
    store_timeout: Duration,
}

impl RequestGate {
    /// Creates a gate over the given stores.
    pub fn new(
        config: &AuthConfig,
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
            identities,
            ledger,
            store_timeout: config.store_timeout(),
        }
    }

    /// Run the full pass for an inbound request's `Authorization` header.
    ///
    /// Only access tokens authenticate general requests. Rejections come
    /// back as `Ok(GateOutcome::Rejected)` so the authorization policy can
    /// still admit the request to a public route; store failures come back
    /// as `Err`.
    pub async fn inspect(&self, authorization: Option<&str>) -> AppResult<GateOutcome> {
        let Some(token) = bearer_token(authorization) else {
            return Ok(GateOutcome::Anonymous);
        };

        match self.verify(token, TokenType::Access).await {
            Ok(identity) => Ok(GateOutcome::Authenticated(identity)),
            Err(GateError::Rejected(failure)) => {
                debug!(reason = ?failure, "Bearer token rejected");
                Ok(GateOutcome::Rejected(failure))
            }
            Err(GateError::Store(err)) => Err(err),
        }
    }

    /// Verify a raw token string that must be of type `expected`.
    ///
    /// Steps run in order and stop at the first failure: signature and
    /// embedded expiry, ledger presence, revocation, ledger expiry, token
    /// type, owner resolution, ban state.
    pub async fn verify(&self, token: &str, expected: TokenType) -> Result<Identity, GateError> {
        let claims = self.decoder.decode(token)?;

        let entry = self
            .bounded("ledger", self.ledger.find_by_token(token))
            .await?
            .ok_or(AuthFailure::TokenNotRecognized)?;

        let now = Utc::now();
        if entry.revoked {
            return Err(AuthFailure::TokenRevoked.into());
        }
        if entry.is_expired_at(now) {
            return Err(AuthFailure::TokenExpired.into());
        }
        if claims.token_type != expected || entry.token_type != expected {
            return Err(AuthFailure::WrongTokenType.into());
        }

        let user = self
            .bounded("identity", self.identities.find_by_id(entry.user_id))
            .await?
            .ok_or(AuthFailure::TokenNotRecognized)?;

        // A token minted for an email the account no longer holds.
        if user.email != claims.sub {
            return Err(AuthFailure::TokenNotRecognized.into());
        }
        if user.is_banned_at(now) {
            return Err(AuthFailure::AccountBanned.into());
        }

        Ok(Identity {
            user,
            claims,
            token: token.to_string(),
        })
    }

    async fn bounded<T, F>(&self, store: &'static str, lookup: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    store,
                    timeout_ms = self.store_timeout.as_millis(),
                    "Store lookup timed out"
                );
                Err(AppError::service_unavailable(format!(
                    "The {store} store did not respond in time"
                )))
            }
        }
    }
}
