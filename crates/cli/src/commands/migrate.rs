//! Database migration command.
//!
//! Applies the migrations embedded in the server crate
//! (`crates/server/migrations/`). Already-applied migrations are skipped.

use nighthawk_server::db::MIGRATOR;

use super::{CommandError, connect};

/// Run all pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!(
        available = MIGRATOR.iter().count(),
        "Running migrations..."
    );
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
