//! Admin account commands.

use clap::{Args, Subcommand};

use estate_auth::{PasswordHasher, PasswordValidator, normalize_email};
use estate_core::config::AppConfig;
use estate_core::error::AppError;
use estate_database::{DatabasePool, IdentityStore, UserRepository};
use estate_entity::user::{CreateUser, UserRole};

use super::UserRow;
use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin account. Missing fields are prompted for.
    Create {
        /// Login email
        #[arg(short, long)]
        email: Option<String>,
        /// Given name
        #[arg(long)]
        first_name: Option<String>,
        /// Family name
        #[arg(long)]
        last_name: Option<String>,
        /// Contact number
        #[arg(short, long)]
        mobile: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    pool: &DatabasePool,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AdminCommand::Create {
            email,
            first_name,
            last_name,
            mobile,
            password,
        } => {
            let email = normalize_email(&prompt_if_missing(email, "Admin email")?);
            let first_name = prompt_if_missing(first_name, "First name")?;
            let last_name = prompt_if_missing(last_name, "Last name")?;
            let mobile_number = prompt_if_missing(mobile, "Mobile number")?;

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            PasswordValidator::new(&config.auth)
                .validate(&password, &[&email, &first_name, &last_name])?;
            let password_hash = PasswordHasher::new(&config.auth)?.hash_password(&password)?;

            let user = UserRepository::new(pool.pool().clone())
                .create(&CreateUser {
                    email,
                    password_hash,
                    first_name,
                    last_name,
                    mobile_number,
                    role: UserRole::Admin,
                })
                .await?;

            output::print_item(&UserRow::from(&user), format);
            output::print_success(&format!("Admin account '{}' created", user.email));
        }
    }

    Ok(())
}

fn prompt_if_missing(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}
