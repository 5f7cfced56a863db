//! Account administration: ban, unban, delete, list, and self-service
//! profile updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use estate_core::error::AppError;
use estate_core::result::AppResult;
use estate_database::store::{IdentityStore, TokenLedger};
use estate_entity::user::{UpdateUser, User, UserRole};

/// Manages accounts on behalf of administrators and their owners.
#[derive(Debug, Clone)]
pub struct AccountManager {
    identities: Arc<dyn IdentityStore>,
    ledger: Arc<dyn TokenLedger>,
}

impl AccountManager {
    /// Creates a manager over the given stores.
    pub fn new(identities: Arc<dyn IdentityStore>, ledger: Arc<dyn TokenLedger>) -> Self {
        Self { identities, ledger }
    }

    /// All accounts, newest first, optionally limited to one role.
    pub async fn list(&self, role: Option<UserRole>) -> AppResult<Vec<User>> {
        self.identities.find_all(role).await
    }

    /// One account by id.
    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        self.identities
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// One account by email.
    pub async fn get_by_email(&self, email: &str) -> AppResult<User> {
        self.identities
            .find_by_email(&crate::issuer::normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found(format!("No account for {email}")))
    }

    /// Ban an account until `banned_till` and revoke all of its tokens.
    pub async fn ban(&self, user_id: Uuid, banned_till: DateTime<Utc>) -> AppResult<User> {
        if banned_till <= Utc::now() {
            return Err(AppError::validation("bannedTill must be in the future"));
        }

        let user = self
            .identities
            .set_banned_till(user_id, Some(banned_till))
            .await?;
        let revoked = self.ledger.revoke_all(user_id).await?;

        info!(user_id = %user_id, %banned_till, revoked, "Account banned");
        Ok(user)
    }

    /// Lift a ban. Tokens revoked by the ban stay revoked.
    pub async fn unban(&self, user_id: Uuid) -> AppResult<User> {
        let user = self.identities.set_banned_till(user_id, None).await?;
        info!(user_id = %user_id, "Account unbanned");
        Ok(user)
    }

    /// Revoke every token of an account, then delete it.
    pub async fn delete(&self, user_id: Uuid) -> AppResult<()> {
        let revoked = self.ledger.revoke_all(user_id).await?;
        if !self.identities.delete(user_id).await? {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        info!(user_id = %user_id, revoked, "Account deleted");
        Ok(())
    }

    /// Update the caller's own profile. Role and email are not editable here.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        mobile_number: Option<String>,
    ) -> AppResult<User> {
        let user = self
            .identities
            .update(&UpdateUser {
                id: user_id,
                first_name,
                last_name,
                mobile_number,
                ..Default::default()
            })
            .await?;
        info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }

    /// Administrative update: profile fields, login email, and role.
    ///
    /// The email is normalized and must not belong to another account.
    /// Changing the email or the role revokes every token of the account,
    /// since both are embedded in issued tokens.
    pub async fn update_account(&self, mut changes: UpdateUser) -> AppResult<User> {
        let current = self.get(changes.id).await?;
        changes.email = changes
            .email
            .as_deref()
            .map(crate::issuer::normalize_email);

        let user = self.identities.update(&changes).await?;
        if changes.changes_identity(&current) {
            let revoked = self.ledger.revoke_all(user.id).await?;
            info!(user_id = %user.id, role = %user.role, revoked, "Account identity changed; tokens revoked");
        } else {
            info!(user_id = %user.id, "Account updated");
        }
        Ok(user)
    }
}
