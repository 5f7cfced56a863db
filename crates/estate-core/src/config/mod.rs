//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section can also be built in code through `Default`.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, StoreProvider};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Identity store and token ledger backend.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token signing, lifetimes, and password policy.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, an environment-specific overlay, and
    /// environment variables prefixed with `ESTATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration from an explicit base file plus the `env` overlay.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ESTATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations that would make the token subsystem unsafe.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 32 bytes",
            ));
        }
        if self.auth.jwt_access_ttl_minutes == 0 || self.auth.jwt_refresh_ttl_hours == 0 {
            return Err(AppError::configuration("token lifetimes must be non-zero"));
        }
        let refresh_minutes = self
            .auth
            .jwt_refresh_ttl_hours
            .checked_mul(60)
            .ok_or_else(|| AppError::configuration("auth.jwt_refresh_ttl_hours is out of range"))?;
        if self.auth.jwt_access_ttl_minutes >= refresh_minutes {
            return Err(AppError::configuration(
                "access tokens must expire before refresh tokens",
            ));
        }
        if self.auth.password_min_strength > 4 {
            return Err(AppError::configuration(
                "auth.password_min_strength must be between 0 and 4",
            ));
        }
        Ok(())
    }
}
