//! Database row types.

use chrono::NaiveDate;
use retail_structs::DailySalesPoint;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trained model metadata stored in the registry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModelRecord {
    pub id: Uuid,
    pub name: String,
    pub version: i32,
    pub artifact_path: String,
    pub training_config: Option<serde_json::Value>,
    pub metrics: Option<serde_json::Value>,
    pub trained_at: DateTime<Utc>,
}

/// Input for registering a new model artifact.
#[derive(Debug, Clone)]
pub struct CreateModelRecord {
    pub name: String,
    pub version: i32,
    pub artifact_path: String,
    pub training_config: Option<serde_json::Value>,
    pub metrics: Option<serde_json::Value>,
}

/// One row of the daily revenue aggregation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct DailyRevenueRow {
    pub day: NaiveDate,
    pub revenue: f64,
}

impl From<DailyRevenueRow> for DailySalesPoint {
    fn from(row: DailyRevenueRow) -> Self {
        Self {
            date: row.day,
            total: row.revenue,
        }
    }
}
