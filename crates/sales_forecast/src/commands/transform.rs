//! Transform command - rebuilds the analytics table inside the warehouse.

use anyhow::{Context, Result};
use database::CleanedSalesRepository;
use sqlx::PgPool;
use tracing::info;

/// Runs the transform command.
///
/// # Errors
///
/// Returns an error if the warehouse transform fails.
pub async fn run(pool: &PgPool) -> Result<()> {
    info!("Rebuilding sales_cleaned from staging");

    let rows = CleanedSalesRepository::rebuild(pool)
        .await
        .context("Warehouse transform failed")?;

    if rows == 0 {
        info!("Transform produced no rows. Has the staging table been loaded?");
    } else {
        info!(rows, "Transform complete");
    }

    Ok(())
}
