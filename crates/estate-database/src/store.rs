//! Storage traits consumed by the token issuer and the request gate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use estate_core::result::AppResult;
use estate_entity::token::{NewToken, Token};
use estate_entity::user::{CreateUser, UpdateUser, User, UserRole};

/// Durable user records: credentials, role, and ban state.
///
/// Implementations enforce email uniqueness and report a collision as
/// `AuthFailure::DuplicateIdentity`.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by exact email. Callers pass the normalized (trimmed,
    /// lowercase) form, which is also the only form ever stored.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List users newest first, optionally restricted to one role.
    async fn find_all(&self, role: Option<UserRole>) -> AppResult<Vec<User>>;

    /// Persist a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial update. An email already used by another account
    /// fails with `AuthFailure::DuplicateIdentity`.
    async fn update(&self, data: &UpdateUser) -> AppResult<User>;

    /// Replace the stored password hash and revoke every token the user
    /// owns, as one atomic unit. Returns how many tokens were revoked.
    ///
    /// Either both changes land or neither does: a failure leaves the old
    /// password and the old tokens in place.
    async fn replace_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<u64>;

    /// Set or clear the ban deadline.
    async fn set_banned_till(
        &self,
        user_id: Uuid,
        banned_till: Option<DateTime<Utc>>,
    ) -> AppResult<User>;

    /// Delete a user and, with it, every ledger row it owns.
    ///
    /// Returns `false` when no such user existed.
    async fn delete(&self, user_id: Uuid) -> AppResult<bool>;
}

/// Durable record of every issued token and its revocation state.
///
/// The ledger is the authority on whether a token string is still usable.
/// Revocation is monotonic: once `revoked` is true it never flips back.
#[async_trait]
pub trait TokenLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Record a newly issued token. Fails with `AuthFailure::DuplicateToken`
    /// if the exact string is already present.
    async fn store(&self, token: &NewToken) -> AppResult<Token>;

    /// Look a token up by exact string match.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Token>>;

    /// Tokens for `user_id` that are neither revoked nor past their expiry.
    async fn find_all_valid(&self, user_id: Uuid) -> AppResult<Vec<Token>>;

    /// Revoke a single token. Revoking an already revoked or unknown token
    /// is a no-op.
    async fn revoke(&self, token: &str) -> AppResult<()>;

    /// Revoke every live token owned by `user_id`. Returns how many flipped.
    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64>;

    /// Revoke every live token for `user_id` and record `tokens`, as one
    /// atomic unit. Concurrent rotations for the same user serialize, so no
    /// observer sees zero or two live pairs.
    async fn rotate(&self, user_id: Uuid, tokens: &[NewToken]) -> AppResult<u64>;
}
