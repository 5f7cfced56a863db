//! In-memory identity store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use estate_core::error::{AppError, AuthFailure};
use estate_core::result::AppResult;
use estate_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::ledger::MemoryTokenLedger;
use crate::store::IdentityStore;

/// Identity store keyed by user id.
///
/// When linked to a [`MemoryTokenLedger`], deleting a user also drops the
/// user's ledger rows, matching the cascade on the PostgreSQL schema, and a
/// password change revokes the user's tokens under the ledger's lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    ledger: Option<MemoryTokenLedger>,
}

impl MemoryIdentityStore {
    /// Create an empty store with no linked ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose deletes cascade into `ledger`.
    pub fn with_ledger(ledger: MemoryTokenLedger) -> Self {
        Self {
            users: Arc::default(),
            ledger: Some(ledger),
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn modify<F>(&self, user_id: Uuid, apply: F) -> AppResult<User>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        apply(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_all(&self, role: Option<UserRole>) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut found: Vec<User> = users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == data.email) {
            return Err(AuthFailure::DuplicateIdentity.into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            mobile_number: data.mobile_number.clone(),
            role: data.role,
            banned_till: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if let Some(email) = &data.email {
            if users.values().any(|u| u.id != data.id && u.email == *email) {
                return Err(AuthFailure::DuplicateIdentity.into());
            }
        }

        let user = users
            .get_mut(&data.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))?;
        let data = data.clone();
        if let Some(first_name) = data.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name;
        }
        if let Some(mobile_number) = data.mobile_number {
            user.mobile_number = mobile_number;
        }
        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(role) = data.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn replace_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<u64> {
        // Ledger before users; rotation only ever holds the ledger lock.
        let mut tokens = match &self.ledger {
            Some(ledger) => Some(ledger.write_tokens().await),
            None => None,
        };
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();

        Ok(tokens
            .as_deref_mut()
            .map_or(0, |tokens| MemoryTokenLedger::revoke_owned(tokens, user_id)))
    }

    async fn set_banned_till(
        &self,
        user_id: Uuid,
        banned_till: Option<DateTime<Utc>>,
    ) -> AppResult<User> {
        self.modify(user_id, move |user| user.banned_till = banned_till)
            .await
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let removed = self.users.write().await.remove(&user_id).is_some();
        if removed {
            if let Some(ledger) = &self.ledger {
                ledger.purge_user(user_id).await;
            }
        }
        Ok(removed)
    }
}
