//! Token ledger repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use estate_core::error::{AppError, AuthFailure, ErrorKind};
use estate_core::result::AppResult;
use estate_entity::token::{NewToken, Token};

use crate::store::TokenLedger;

/// PostgreSQL-backed token ledger.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(conn: &mut PgConnection, token: &NewToken) -> AppResult<Token> {
        sqlx::query_as::<_, Token>(
            "INSERT INTO tokens (token, token_type, user_id, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&token.token)
        .bind(token.token_type)
        .bind(token.user_id)
        .bind(token.expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("tokens_token_key") => {
                AppError::from(AuthFailure::DuplicateToken)
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to store token", e),
        })
    }

    async fn revoke_all_on(conn: &mut PgConnection, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE")
                .bind(user_id)
                .execute(conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke tokens", e)
                })?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TokenLedger for TokenRepository {
    async fn store(&self, token: &NewToken) -> AppResult<Token> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        Self::insert(&mut *conn, token).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Token>> {
        sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    async fn find_all_valid(&self, user_id: Uuid) -> AppResult<Vec<Token>> {
        sqlx::query_as::<_, Token>(
            "SELECT * FROM tokens WHERE user_id = $1 AND revoked = FALSE AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list valid tokens", e))
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE tokens SET revoked = TRUE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;
        Ok(())
    }

    async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        Self::revoke_all_on(&mut *conn, user_id).await
    }

    async fn rotate(&self, user_id: Uuid, tokens: &[NewToken]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Row lock on the owner serializes concurrent rotations for one user.
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock user", e))?;
        if owner.is_none() {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let revoked = Self::revoke_all_on(&mut *tx, user_id).await?;
        for token in tokens {
            Self::insert(&mut *tx, token).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit token rotation", e)
        })?;
        Ok(revoked)
    }
}
