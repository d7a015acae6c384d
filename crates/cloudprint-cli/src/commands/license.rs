//! License provisioning and lifecycle commands.
//!
//! Renew and revoke are the whole billing-integration surface: an
//! external subscription system extends or cancels validity through the
//! same two operations.

use chrono::NaiveDate;
use clap::Subcommand;
use sqlx::PgPool;

use cloudprint_core::error::AppError;
use cloudprint_core::result::AppResult;
use cloudprint_database::repositories::LicenseRepository;
use cloudprint_entity::license::NewLicense;

use crate::output;

/// License subcommands.
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Provision a new license and print its key.
    Create {
        /// Owning customer.
        #[arg(long)]
        customer: String,
        /// Expiration date (YYYY-MM-DD); omit for a perpetual license.
        #[arg(long)]
        expires: Option<NaiveDate>,
        /// Maximum number of distinct print servers.
        #[arg(long, default_value_t = 1)]
        server_limit: i32,
    },
    /// List all licenses.
    List,
    /// Extend a license's validity.
    Renew {
        /// The license key.
        key: String,
        /// New expiration date (YYYY-MM-DD).
        #[arg(long)]
        until: NaiveDate,
    },
    /// Deactivate a license; its derived state becomes cancelled.
    Revoke {
        /// The license key.
        key: String,
    },
}

impl LicenseCommand {
    /// Execute the subcommand against the given database.
    pub async fn execute(self, pool: PgPool) -> AppResult<()> {
        let repo = LicenseRepository::new(pool);

        match self {
            Self::Create {
                customer,
                expires,
                server_limit,
            } => {
                let license = repo
                    .create(&NewLicense {
                        customer,
                        expiration_date: expires,
                        server_limit,
                    })
                    .await?;
                println!("License created for {}", license.customer);
                println!("Key: {}", license.key);
                Ok(())
            }
            Self::List => {
                let licenses = repo.list().await?;
                output::print_licenses(&licenses);
                Ok(())
            }
            Self::Renew { key, until } => {
                if !repo.set_expiration(&key, Some(until)).await? {
                    return Err(AppError::not_found("No license with that key"));
                }
                println!("License renewed until {until}");
                Ok(())
            }
            Self::Revoke { key } => {
                if !repo.set_active(&key, false).await? {
                    return Err(AppError::not_found("No license with that key"));
                }
                println!("License revoked");
                Ok(())
            }
        }
    }
}
