//! Train command - fits the SARIMA model on the daily revenue series.

use anyhow::{Context, Result};
use config::CONFIG;
use database::{CleanedSalesRepository, CreateModelRecord, ModelRepository};
use forecast_model::{ModelArtifact, Sarima, SarimaSpec, TrainingMetrics, metrics};
use retail_structs::fill_daily_gaps;
use sqlx::PgPool;
use tracing::info;

/// Parses an order triple given as "p,d,q".
///
/// # Errors
///
/// Returns an error if the string is not three comma-separated integers.
pub fn parse_order(input: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<usize> = input
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<Result<_, _>>()
        .with_context(|| format!("Invalid order '{input}', expected \"p,d,q\""))?;

    match parts.as_slice() {
        [p, d, q] => Ok((*p, *d, *q)),
        _ => anyhow::bail!("Invalid order '{input}', expected exactly three values"),
    }
}

/// Runs the train command.
///
/// # Errors
///
/// Returns an error if the series cannot be fetched, the fit fails, or
/// the artifact cannot be written or registered.
pub async fn run(pool: &PgPool, name: &str, spec: SarimaSpec) -> Result<()> {
    info!(name, model = %spec, "Starting training");

    let cleaned = CleanedSalesRepository::count(pool).await?;
    if cleaned == 0 {
        anyhow::bail!("Analytics table is empty. Run `load` and `transform` first.");
    }

    let points = CleanedSalesRepository::daily_revenue(pool)
        .await
        .context("Failed to fetch the daily revenue series")?;

    if points.is_empty() {
        anyhow::bail!("No cleaned sales fall inside the training date window.");
    }

    let series = fill_daily_gaps(&points);
    let start = series[0].date;
    let end = series[series.len() - 1].date;
    info!(days = series.len(), from = %start, to = %end, "Daily series built");

    let values: Vec<f64> = series.iter().map(|p| p.total).collect();
    let model = Sarima::fit(spec, &values).context("Model fitting failed")?;

    // In-sample accuracy, the headline number the stakeholders ask for.
    let (actual, fitted) = model.in_sample_fit();
    let mape = metrics::mape(&actual, &fitted);
    let rmse = metrics::rmse(&actual, &fitted);
    match mape {
        Some(mape) => info!(
            "In-sample fit: MAPE {:.2}%, accuracy {:.2}%, RMSE {:.2}",
            mape,
            100.0 - mape,
            rmse
        ),
        None => info!("In-sample fit: RMSE {rmse:.2}"),
    }

    let metrics = TrainingMetrics {
        mape,
        rmse,
        aic: model.aic(),
        bic: model.bic(),
    };

    let version = ModelRepository::next_version(pool, name).await?;
    let artifact_path = CONFIG.model_dir.join(format!("{name}_v{version}.json"));

    let artifact = ModelArtifact::new(name.to_string(), start, model, metrics);
    artifact
        .save(&artifact_path)
        .with_context(|| format!("Failed to write artifact to {}", artifact_path.display()))?;

    let training_config = serde_json::json!({
        "order": [spec.p, spec.d, spec.q],
        "seasonal_order": [spec.seasonal_p, spec.seasonal_d, spec.seasonal_q],
        "period": spec.period,
        "observations": values.len(),
    });
    let metrics_json = serde_json::json!({
        "mape": metrics.mape,
        "rmse": metrics.rmse,
        "aic": metrics.aic,
        "bic": metrics.bic,
    });

    ModelRepository::create(
        pool,
        CreateModelRecord {
            name: name.to_string(),
            version,
            artifact_path: artifact_path.to_string_lossy().to_string(),
            training_config: Some(training_config),
            metrics: Some(metrics_json),
        },
    )
    .await?;

    info!(
        name,
        version,
        artifact_path = %artifact_path.display(),
        "Training complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("1,1,1").unwrap(), (1, 1, 1));
        assert_eq!(parse_order("2, 0, 1").unwrap(), (2, 0, 1));
        assert_eq!(parse_order("0,1,0").unwrap(), (0, 1, 0));
    }

    #[test]
    fn test_parse_order_rejects_bad_input() {
        assert!(parse_order("1,1").is_err());
        assert!(parse_order("1,1,1,1").is_err());
        assert!(parse_order("a,b,c").is_err());
        assert!(parse_order("").is_err());
    }
}
