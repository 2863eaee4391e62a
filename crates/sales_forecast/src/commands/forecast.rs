//! Forecast command - renders future sales from a trained model.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use database::ModelRepository;
use forecast_model::ModelArtifact;
use retail_structs::SalesSummary;
use sqlx::PgPool;
use tracing::info;

/// Runs the forecast command.
///
/// Loads the artifact from `model_path` when given, otherwise from the
/// latest registry entry for `name`.
///
/// # Errors
///
/// Returns an error if no model can be found, the artifact fails to
/// load, or the horizon/level are invalid.
pub async fn run(
    pool: &PgPool,
    name: &str,
    model_path: Option<&Path>,
    horizon: usize,
    level: f64,
) -> Result<()> {
    let path = match model_path {
        Some(path) => path.to_path_buf(),
        None => {
            let record = ModelRepository::find_latest(pool, name)
                .await?
                .with_context(|| {
                    format!("No trained model named '{name}' in the registry. Run `train` first.")
                })?;
            info!(name, version = record.version, "Using latest registered model");
            PathBuf::from(record.artifact_path)
        }
    };

    let artifact = ModelArtifact::load(&path)
        .with_context(|| format!("Failed to load model artifact from {}", path.display()))?;

    info!(
        model = %artifact.model_name,
        spec = %artifact.model.spec(),
        trained_at = %artifact.trained_at,
        "Model loaded"
    );

    if let Some(summary) = SalesSummary::from_series(&artifact.history()) {
        info!(
            "Training history: {} days, total revenue {:.2}, daily average {:.2}, peak {} ({:.2})",
            summary.days,
            summary.total_revenue,
            summary.daily_average,
            summary.peak_day,
            summary.peak_revenue
        );
    }

    let bands = artifact.model.forecast_with_intervals(horizon, level)?;
    let dates = artifact.forecast_dates(horizon);

    println!("Sales forecast for the next {horizon} days ({:.0}% interval):", level * 100.0);
    println!("{:<12} {:>14} {:>14} {:>14}", "date", "predicted", "lower", "upper");
    for (i, date) in dates.iter().enumerate() {
        println!(
            "{:<12} {:>14.2} {:>14.2} {:>14.2}",
            date, bands.mean[i], bands.lower[i], bands.upper[i]
        );
    }

    let total: f64 = bands.mean.iter().sum();
    println!("Projected revenue over the horizon: {total:.2}");

    Ok(())
}
