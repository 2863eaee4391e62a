//! Serialized model artifact: the single file handed from the trainer to
//! the forecasting surface.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, Utc};
use retail_structs::DailySalesPoint;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::sarima::Sarima;

/// Bumped whenever the artifact schema changes; a mismatch on load is an
/// error rather than a silent misread.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// In-sample accuracy recorded at training time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Mean absolute percentage error; `None` when every actual was zero
    pub mape: Option<f64>,
    pub rmse: f64,
    pub aic: f64,
    pub bic: f64,
}

/// A fitted model plus everything the serving surface needs: the
/// training series (with its calendar anchor) and accuracy metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_name: String,
    pub trained_at: DateTime<Utc>,
    /// Calendar date of the first training observation
    pub series_start: NaiveDate,
    pub metrics: TrainingMetrics,
    pub model: Sarima,
}

/// Minimal probe so a future-format file fails with a version error, not
/// a deserialization error.
#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

impl ModelArtifact {
    #[must_use]
    pub fn new(
        model_name: String,
        series_start: NaiveDate,
        model: Sarima,
        metrics: TrainingMetrics,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model_name,
            trained_at: Utc::now(),
            series_start,
            metrics,
            model,
        }
    }

    /// Writes the artifact as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialized.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads an artifact back, rejecting files written by an
    /// incompatible crate version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or carries a different `format_version`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;

        let probe: VersionProbe = serde_json::from_str(&raw)?;
        if probe.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedArtifact {
                expected: ARTIFACT_FORMAT_VERSION,
                got: probe.format_version,
            });
        }

        Ok(serde_json::from_str(&raw)?)
    }

    /// The training series as dated points.
    #[must_use]
    pub fn history(&self) -> Vec<DailySalesPoint> {
        self.model
            .observations()
            .iter()
            .enumerate()
            .map(|(i, total)| DailySalesPoint {
                date: self.series_start + Days::new(i as u64),
                total: *total,
            })
            .collect()
    }

    /// Date of the last training observation.
    #[must_use]
    pub fn last_date(&self) -> NaiveDate {
        let len = self.model.observations().len();
        self.series_start + Days::new(len.saturating_sub(1) as u64)
    }

    /// Calendar dates for an `horizon`-step forecast, starting the day
    /// after the last observation.
    #[must_use]
    pub fn forecast_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let last = self.last_date();
        (1..=horizon as u64).map(|h| last + Days::new(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::sarima::SarimaSpec;

    use super::*;

    fn fixture() -> ModelArtifact {
        let series: Vec<f64> = (0..42)
            .map(|i| 100.0 + 20.0 * f64::from(i % 7) + f64::from(i))
            .collect();
        let model = Sarima::fit(SarimaSpec::daily_weekly(), &series).unwrap();

        ModelArtifact::new(
            "daily_sales".to_string(),
            NaiveDate::from_ymd_opt(2010, 12, 1).unwrap(),
            model,
            TrainingMetrics {
                mape: Some(4.2),
                rmse: 31.0,
                aic: 120.0,
                bic: 130.0,
            },
        )
    }

    #[test]
    fn test_save_load_round_trip() {
        let artifact = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_sales_1.json");

        artifact.save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();

        assert_eq!(loaded.model_name, "daily_sales");
        assert_eq!(loaded.series_start, artifact.series_start);
        assert_eq!(loaded.model.observations(), artifact.model.observations());
        assert_eq!(loaded.model.forecast(14), artifact.model.forecast(14));
    }

    #[test]
    fn test_load_rejects_other_format_version() {
        let artifact = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.json");
        artifact.save(&path).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        raw["format_version"] = serde_json::json!(99);
        std::fs::write(&path, serde_json::to_string(&raw).unwrap()).unwrap();

        let result = ModelArtifact::load(&path);
        assert!(matches!(
            result,
            Err(ModelError::UnsupportedArtifact { expected: 1, got: 99 })
        ));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let artifact = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/models/artifact.json");

        artifact.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_history_dates_are_contiguous() {
        let artifact = fixture();
        let history = artifact.history();

        assert_eq!(history.len(), 42);
        assert_eq!(history[0].date, artifact.series_start);
        assert!(history.windows(2).all(|w| w[1].date - w[0].date == chrono::Duration::days(1)));
        assert_eq!(artifact.last_date(), history.last().unwrap().date);
    }

    #[test]
    fn test_forecast_dates_follow_history() {
        let artifact = fixture();
        let dates = artifact.forecast_dates(7);

        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], artifact.last_date() + Days::new(1));
        assert_eq!(dates[6], artifact.last_date() + Days::new(7));
    }
}
