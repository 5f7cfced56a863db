//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token signing, lifetimes, gate bounds, and password policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub jwt_refresh_ttl_hours: u64,
    /// Clock-skew leeway applied to the embedded expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn score (0-4). Zero disables the entropy check.
    #[serde(default)]
    pub password_min_strength: u8,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_hash_memory")]
    pub password_hash_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_hash_iterations")]
    pub password_hash_iterations: u32,
    /// Upper bound on each identity/ledger lookup made by the request gate.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl AuthConfig {
    /// Store lookup bound as a `Duration`.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_access_ttl_minutes: default_access_ttl(),
            jwt_refresh_ttl_hours: default_refresh_ttl(),
            jwt_leeway_seconds: default_leeway(),
            password_min_length: default_password_min(),
            password_min_strength: 0,
            password_hash_memory_kib: default_hash_memory(),
            password_hash_iterations: default_hash_iterations(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_0123456789abcdef".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    168
}

fn default_leeway() -> u64 {
    5
}

fn default_password_min() -> usize {
    8
}

fn default_hash_memory() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_store_timeout() -> u64 {
    2000
}
