//! Migration runner command.

use sqlx::PgPool;

use cloudprint_core::result::AppResult;
use cloudprint_database::migration;

/// Run all pending migrations.
pub async fn execute(pool: PgPool) -> AppResult<()> {
    migration::run_migrations(&pool).await?;
    println!("Migrations complete");
    Ok(())
}
