//! Database migration commands.

use clap::{Args, Subcommand};

use estate_core::error::AppError;
use estate_database::DatabasePool;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, pool: &DatabasePool) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            estate_database::migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
