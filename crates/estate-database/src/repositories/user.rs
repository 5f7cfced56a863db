//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use estate_core::error::{AppError, AuthFailure, ErrorKind};
use estate_core::result::AppResult;
use estate_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::store::IdentityStore;

/// PostgreSQL-backed identity store.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_email_conflict(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::from(AuthFailure::DuplicateIdentity)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl IdentityStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_all(&self, role: Option<UserRole>) -> AppResult<Vec<User>> {
        let query = match role {
            Some(role) => sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC",
            )
            .bind(role),
            None => sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC"),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, first_name, last_name, mobile_number, role) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.mobile_number)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to create user"))
    }

    async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = COALESCE($2, first_name), \
                              last_name = COALESCE($3, last_name), \
                              mobile_number = COALESCE($4, mobile_number), \
                              email = COALESCE($5, email), \
                              role = COALESCE($6, role), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.mobile_number)
        .bind(&data.email)
        .bind(data.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))
    }

    async fn replace_password(&self, user_id: Uuid, password_hash: &str) -> AppResult<u64> {
        let db_err = |context: &'static str| {
            move |e: sqlx::Error| AppError::with_source(ErrorKind::Database, context, e)
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        // Takes the row lock token rotation waits on.
        let updated = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to update password"))?;
        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let revoked =
            sqlx::query("UPDATE tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("Failed to revoke tokens"))?
                .rows_affected();

        tx.commit()
            .await
            .map_err(db_err("Failed to commit password change"))?;
        Ok(revoked)
    }

    async fn set_banned_till(
        &self,
        user_id: Uuid,
        banned_till: Option<DateTime<Utc>>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET banned_till = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(banned_till)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update ban", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
