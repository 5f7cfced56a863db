//! In-memory token ledger.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

use estate_core::error::AuthFailure;
use estate_core::result::AppResult;
use estate_entity::token::{NewToken, Token};

use crate::store::TokenLedger;

/// Token ledger keyed by the token string.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenLedger {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl MemoryTokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows, revoked ones included.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Whether the ledger holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Drop every row owned by `user_id`.
    pub(crate) async fn purge_user(&self, user_id: Uuid) {
        self.tokens
            .write()
            .await
            .retain(|_, token| token.user_id != user_id);
    }

    pub(crate) async fn write_tokens(&self) -> RwLockWriteGuard<'_, HashMap<String, Token>> {
        self.tokens.write().await
    }

    fn insert(tokens: &mut HashMap<String, Token>, token: &NewToken) -> AppResult<Token> {
        if tokens.contains_key(&token.token) {
            return Err(AuthFailure::DuplicateToken.into());
        }
        let row = Token {
            id: Uuid::new_v4(),
            token: token.token.clone(),
            token_type: token.token_type,
            revoked: false,
            user_id: token.user_id,
            created_at: Utc::now(),
            expires_at: token.expires_at,
        };
        tokens.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    pub(crate) fn revoke_owned(tokens: &mut HashMap<String, Token>, user_id: Uuid) -> u64 {
        let mut count = 0;
        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.revoked {
                token.revoked = true;
                count += 1;
            }
        }
        count
    }
}

#[async_trait]
impl TokenLedger for MemoryTokenLedger {
    async fn store(&self, token: &NewToken) -> AppResult<Token> {
        Self::insert(&mut *self.tokens.write().await, token)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Token>> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn find_all_valid(&self, user_id: Uuid) -> AppResult<Vec<Token>> {
        let now = Utc::now();
        let tokens = self.tokens.read().await;
        let mut valid: Vec<Token> = tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_usable_at(now))
            .cloned()
            .collect();
        valid.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(valid)
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        if let Some(row) = self.tokens.write().await.get_mut(token) {
            row.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(Self::revoke_owned(&mut *self.tokens.write().await, user_id))
    }

    async fn rotate(&self, user_id: Uuid, tokens: &[NewToken]) -> AppResult<u64> {
        let mut guard = self.tokens.write().await;
        if let Some(dup) = tokens.iter().find(|t| guard.contains_key(&t.token)) {
            tracing::warn!(user_id = %dup.user_id, "Rotation rejected: token string already recorded");
            return Err(AuthFailure::DuplicateToken.into());
        }
        let revoked = Self::revoke_owned(&mut guard, user_id);
        for token in tokens {
            Self::insert(&mut guard, token)?;
        }
        Ok(revoked)
    }
}
