//! CLI command tree.

pub mod license;
pub mod migrate;

use clap::{Parser, Subcommand};

use cloudprint_core::config::DatabaseConfig;
use cloudprint_core::error::AppError;
use cloudprint_core::result::AppResult;
use cloudprint_database::connection;

use license::LicenseCommand;

/// CloudPrint administration CLI.
#[derive(Debug, Parser)]
#[command(name = "cloudprint-cli", version, about = "CloudPrint administration")]
pub struct Cli {
    /// PostgreSQL connection URL.
    #[arg(long, env = "CLOUDPRINT_DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// License provisioning and lifecycle.
    License {
        #[command(subcommand)]
        command: LicenseCommand,
    },
    /// Run pending database migrations.
    Migrate,
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> AppResult<()> {
        let url = self.database_url.ok_or_else(|| {
            AppError::configuration(
                "No database URL. Pass --database-url or set CLOUDPRINT_DATABASE_URL.",
            )
        })?;

        let pool = connection::create_pool(&DatabaseConfig::from_url(url)).await?;

        match self.command {
            Commands::License { command } => command.execute(pool).await,
            Commands::Migrate => migrate::execute(pool).await,
        }
    }
}
