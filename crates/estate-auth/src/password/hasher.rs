//! Argon2id password hashing and verification.
//!
//! The async methods run Argon2 on tokio's blocking pool; the sync ones are
//! for callers outside the runtime, such as the CLI.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use estate_core::config::AuthConfig;
use estate_core::error::AppError;
use estate_core::result::AppResult;

/// Input for the dummy hash verified when a login names no account.
const DUMMY_PASSWORD: &str = "estate-dummy-password";

/// Salted one-way password hashing using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Creates a hasher with the configured memory and iteration cost.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.password_hash_memory_kib,
            config.password_hash_iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash_password(DUMMY_PASSWORD)?);
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC hash string.
    ///
    /// The parameters embedded in the hash are used, so hashes written under
    /// an older cost setting keep verifying.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// [`hash_password`](Self::hash_password) on the blocking pool.
    pub async fn hash(&self, password: &str) -> AppResult<String> {
        let hasher = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`verify_password`](Self::verify_password) on the blocking pool.
    pub async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
    }

    /// Spend one verification's worth of work against a hash no account
    /// owns. Always `false`; keeps unknown-email logins as slow as
    /// wrong-password ones.
    pub async fn verify_dummy(&self, password: &str) -> AppResult<bool> {
        let dummy = self.dummy_hash.clone();
        self.verify(password, &dummy).await.map(|_| false)
    }
}
