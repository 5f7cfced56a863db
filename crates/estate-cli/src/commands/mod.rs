//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use estate_auth::AccountManager;
use estate_core::config::AppConfig;
use estate_core::error::AppError;
use estate_database::{DatabasePool, TokenRepository, UserRepository};
use estate_entity::user::User;

use crate::output::OutputFormat;

/// Estate backend administration
#[derive(Debug, Parser)]
#[command(name = "estate-cli", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
    /// User management
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        let pool = DatabasePool::connect(&config.database).await?;

        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &pool).await,
            Commands::Admin(args) => admin::execute(args, &config, &pool, self.format).await,
            Commands::User(args) => user::execute(args, &pool, self.format).await,
        };

        pool.close().await;
        result
    }
}

/// Account manager over the PostgreSQL stores.
pub(crate) fn account_manager(pool: &DatabasePool) -> AccountManager {
    AccountManager::new(
        Arc::new(UserRepository::new(pool.pool().clone())),
        Arc::new(TokenRepository::new(pool.pool().clone())),
    )
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Full name
    name: String,
    /// Role
    role: String,
    /// Banned until
    banned_till: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            name: u.full_name(),
            role: u.role.to_string(),
            banned_till: u
                .banned_till
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}
