//! Token issuing: registration, login, refresh, logout, password reset.
//!
//! Every successful login-like operation rotates the owner's ledger
//! entries, so an account has at most one live access/refresh pair.

use std::sync::Arc;

use tracing::{info, warn};

use estate_core::config::AuthConfig;
use estate_core::error::{AppError, AuthFailure};
use estate_core::result::AppResult;
use estate_database::store::{IdentityStore, TokenLedger};
use estate_entity::token::TokenType;
use estate_entity::user::{CreateUser, User, UserRole};

use crate::gate::RequestGate;
use crate::jwt::{JwtEncoder, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact number.
    pub mobile_number: String,
    /// Login email.
    pub email: String,
    /// Plaintext password; hashed before it reaches the store.
    pub password: String,
    /// Role to assign.
    pub role: UserRole,
}

/// A freshly issued session: the account and its new token pair.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The account the pair belongs to.
    pub user: User,
    /// The new access/refresh pair.
    pub tokens: TokenPair,
}

impl IssuedSession {
    /// The access token string.
    pub fn access_token(&self) -> &str {
        &self.tokens.access.token
    }

    /// The refresh token string.
    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh.token
    }
}

/// Creates and retires token pairs.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    identities: Arc<dyn IdentityStore>,
    ledger: Arc<dyn TokenLedger>,
    encoder: JwtEncoder,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    gate: RequestGate,
}

/// Canonical form of a login email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl TokenIssuer {
    /// Creates an issuer over the given stores.
    pub fn new(
        config: &AuthConfig,
        identities: Arc<dyn IdentityStore>,
        ledger: Arc<dyn TokenLedger>,
    ) -> AppResult<Self> {
        Ok(Self {
            encoder: JwtEncoder::new(config),
            hasher: PasswordHasher::new(config)?,
            validator: PasswordValidator::new(config),
            gate: RequestGate::new(config, identities.clone(), ledger.clone()),
            identities,
            ledger,
        })
    }

    /// Create an account and log it in.
    pub async fn register(&self, account: NewAccount) -> AppResult<IssuedSession> {
        let email = normalize_email(&account.email);
        self.validator.validate(
            &account.password,
            &[&email, &account.first_name, &account.last_name],
        )?;
        let password_hash = self.hasher.hash(&account.password).await?;

        let user = self
            .identities
            .create(&CreateUser {
                email,
                password_hash,
                first_name: account.first_name,
                last_name: account.last_name,
                mobile_number: account.mobile_number,
                role: account.role,
            })
            .await
            .inspect_err(|e| {
                if e.is_auth_failure(AuthFailure::DuplicateIdentity) {
                    warn!("Registration rejected: email already registered");
                }
            })?;

        info!(user_id = %user.id, role = %user.role, "Account registered");
        self.issue(user).await
    }

    /// Check credentials and log the account in.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller,
    /// in the response and in the time taken: an unknown email still costs
    /// one Argon2 verification. The ban is only reported once the password
    /// has been verified.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<IssuedSession> {
        let email = normalize_email(email);
        let Some(user) = self.identities.find_by_email(&email).await? else {
            self.hasher.verify_dummy(password).await?;
            warn!("Login failed: unknown email");
            return Err(AuthFailure::InvalidCredentials.into());
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthFailure::InvalidCredentials.into());
        }

        if user.is_banned() {
            warn!(user_id = %user.id, banned_till = ?user.banned_till, "Login refused: account banned");
            return Err(AuthFailure::AccountBanned.into());
        }

        info!(user_id = %user.id, "Login successful");
        self.issue(user).await
    }

    /// Trade a live refresh token for a new pair. The old pair is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<IssuedSession> {
        let identity = self.gate.verify(refresh_token, TokenType::Refresh).await?;
        info!(user_id = %identity.user.id, "Refreshing token pair");
        self.issue(identity.user).await
    }

    /// Revoke every token of the access token's owner.
    ///
    /// Logging out with an already revoked token is a no-op; a token the
    /// ledger has never seen is rejected.
    pub async fn logout(&self, access_token: &str) -> AppResult<()> {
        let entry = self
            .ledger
            .find_by_token(access_token)
            .await?
            .ok_or(AuthFailure::TokenNotRecognized)?;
        if entry.token_type != TokenType::Access {
            return Err(AuthFailure::WrongTokenType.into());
        }

        let revoked = self.ledger.revoke_all(entry.user_id).await?;
        info!(user_id = %entry.user_id, revoked, "Logged out");
        Ok(())
    }

    /// Change the password of the access token's owner and revoke all of
    /// that owner's tokens, the presenting one included. The identity store
    /// applies both in one step, so a failure changes nothing.
    pub async fn reset_password(&self, access_token: &str, new_password: &str) -> AppResult<()> {
        let identity = self.gate.verify(access_token, TokenType::Access).await?;
        let user = identity.user;

        self.validator
            .validate(new_password, &[&user.email, &user.first_name, &user.last_name])?;
        if self.hasher.verify(new_password, &user.password_hash).await? {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }

        let password_hash = self.hasher.hash(new_password).await?;
        let revoked = self
            .identities
            .replace_password(user.id, &password_hash)
            .await?;

        info!(user_id = %user.id, revoked, "Password reset; all tokens revoked");
        Ok(())
    }

    /// Resolve the owner of a live token of the expected type.
    pub async fn user_by_token(&self, token: &str, expected: TokenType) -> AppResult<User> {
        let identity = self.gate.verify(token, expected).await?;
        Ok(identity.user)
    }

    async fn issue(&self, user: User) -> AppResult<IssuedSession> {
        let tokens = self.encoder.sign_pair(&user)?;
        let superseded = self
            .ledger
            .rotate(user.id, &tokens.ledger_entries(user.id))
            .await?;
        info!(user_id = %user.id, superseded, "Token pair issued");
        Ok(IssuedSession { user, tokens })
    }
}
