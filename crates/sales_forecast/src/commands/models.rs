//! Models command - lists registered model artifacts.

use anyhow::Result;
use database::ModelRepository;
use sqlx::PgPool;

/// Runs the models command.
///
/// # Errors
///
/// Returns an error if the registry query fails.
pub async fn run(pool: &PgPool, name: &str) -> Result<()> {
    let records = ModelRepository::list_versions(pool, name).await?;

    if records.is_empty() {
        println!("No models named '{name}' in the registry.");
        return Ok(());
    }

    println!("{:<8} {:<22} {}", "version", "trained_at", "artifact");
    for record in &records {
        println!(
            "{:<8} {:<22} {}",
            record.version,
            record.trained_at.format("%Y-%m-%d %H:%M UTC"),
            record.artifact_path
        );
    }

    Ok(())
}
