//! Load command - extracts the source file and appends to staging.

use std::path::Path;

use anyhow::{Context, Result};
use database::RawSalesRepository;
use retail_extractor::extract_transactions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Runs the load command.
///
/// # Errors
///
/// Returns an error if extraction or the warehouse load fails.
pub async fn run(pool: &PgPool, file: &Path, truncate: bool) -> Result<()> {
    info!(file = %file.display(), "Starting extract and load");

    let extraction = extract_transactions(file)
        .with_context(|| format!("Failed to extract transactions from {}", file.display()))?;

    info!(
        rows_read = extraction.rows_read,
        kept = extraction.transactions.len(),
        dropped = extraction.rows_dropped,
        "Extraction complete"
    );

    if extraction.transactions.is_empty() {
        anyhow::bail!("No parseable rows in {}", file.display());
    }

    if truncate {
        RawSalesRepository::truncate(pool).await?;
        info!("Staging table truncated");
    } else {
        let existing = RawSalesRepository::count(pool).await?;
        if existing > 0 {
            // Loading is append-only; duplicates are the operator's call.
            warn!(existing, "Staging table already has rows; this load will append");
        }
    }

    let inserted = RawSalesRepository::insert_batch(pool, &extraction.transactions)
        .await
        .context("Failed to load rows into the warehouse")?;

    info!(inserted, "Load complete");

    Ok(())
}
