//! User management commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use estate_core::error::AppError;
use estate_database::DatabasePool;
use estate_entity::user::UserRole;

use super::{UserRow, account_manager};
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List accounts, newest first
    List {
        /// Filter by role (ADMIN, CUSTOMER, DEALER)
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Ban an account and revoke its tokens
    Ban {
        /// Login email
        email: String,
        /// End of the ban, RFC 3339
        #[arg(long)]
        until: DateTime<Utc>,
    },
    /// Lift a ban
    Unban {
        /// Login email
        email: String,
    },
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    pool: &DatabasePool,
    format: OutputFormat,
) -> Result<(), AppError> {
    let accounts = account_manager(pool);

    match &args.command {
        UserCommand::List { role } => {
            let users = accounts.list(*role).await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Ban { email, until } => {
            let user = accounts.get_by_email(email).await?;
            let user = accounts.ban(user.id, *until).await?;
            output::print_item(&UserRow::from(&user), format);
            output::print_success(&format!("User '{}' banned until {until}", user.email));
        }
        UserCommand::Unban { email } => {
            let user = accounts.get_by_email(email).await?;
            let user = accounts.unban(user.id).await?;
            output::print_item(&UserRow::from(&user), format);
            output::print_success(&format!("User '{}' unbanned", user.email));
        }
    }

    Ok(())
}
