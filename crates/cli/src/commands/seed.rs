//! Sample data command.
//!
//! Runs the same seeder the server runs on startup. Safe to repeat.

use nighthawk_server::seed::Seeder;

use super::{CommandError, connect};

/// Insert the sample customers and jokes that are missing.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let report = Seeder::new(&pool).run().await?;

    tracing::info!(
        "Seed complete: {} customers inserted ({} already present), {} jokes inserted ({} already present)",
        report.customers_inserted,
        report.customers_skipped,
        report.jokes_inserted,
        report.jokes_skipped
    );
    Ok(())
}
