//! API route handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use retail_structs::{DailySalesPoint, SalesSummary};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Longest forecast the surface will produce.
const MAX_HORIZON: usize = 365;

/// Confidence level used when the request does not specify one.
const DEFAULT_LEVEL: f64 = 0.95;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Liveness probe with model identity.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.artifact.model_name,
        "trained_at": state.artifact.trained_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Trailing window in days; the whole series when omitted
    pub days: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub series: Vec<DailySalesPoint>,
}

/// Returns the training series, optionally truncated to a trailing
/// window as the dashboard chart does.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let mut series = state.artifact.history();

    if let Some(days) = params.days {
        if days < series.len() {
            series = series.split_off(series.len() - days);
        }
    }

    Json(HistoryResponse { series })
}

/// Headline KPIs over the training history.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SalesSummary>, ApiError> {
    SalesSummary::from_series(&state.artifact.history())
        .map(Json)
        .ok_or_else(|| bad_request("model artifact contains no history"))
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Number of days to forecast
    pub horizon: usize,

    /// Confidence level for the interval bands (default 0.95)
    pub level: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub model: String,
    pub horizon: usize,
    pub level: f64,
    pub points: Vec<ForecastPoint>,
}

/// Produces dated point forecasts with confidence bands.
pub async fn forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    if request.horizon == 0 || request.horizon > MAX_HORIZON {
        return Err(bad_request(format!(
            "horizon must be between 1 and {MAX_HORIZON}, got {}",
            request.horizon
        )));
    }

    let level = request.level.unwrap_or(DEFAULT_LEVEL);
    let bands = state
        .artifact
        .model
        .forecast_with_intervals(request.horizon, level)
        .map_err(|e| bad_request(e.to_string()))?;

    let dates = state.artifact.forecast_dates(request.horizon);
    let points = dates
        .into_iter()
        .zip(bands.mean.iter().zip(bands.lower.iter().zip(bands.upper.iter())))
        .map(|(date, (&predicted, (&lower, &upper)))| ForecastPoint {
            date,
            predicted,
            lower,
            upper,
        })
        .collect();

    Ok(Json(ForecastResponse {
        model: state.artifact.model_name.clone(),
        horizon: request.horizon,
        level,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use forecast_model::{ModelArtifact, Sarima, SarimaSpec, TrainingMetrics};

    use super::*;

    fn test_state() -> AppState {
        let series: Vec<f64> = (0..56)
            .map(|i| 200.0 + 40.0 * f64::from(i % 7) + 2.0 * f64::from(i))
            .collect();
        let model = Sarima::fit(SarimaSpec::daily_weekly(), &series).unwrap();
        let artifact = ModelArtifact::new(
            "daily_sales".to_string(),
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            model,
            TrainingMetrics {
                mape: Some(5.0),
                rmse: 12.0,
                aic: 300.0,
                bic: 310.0,
            },
        );

        AppState {
            artifact: Arc::new(artifact),
        }
    }

    #[tokio::test]
    async fn test_forecast_returns_exact_horizon() {
        let state = test_state();

        for horizon in [1, 7, 30] {
            let response = forecast(
                State(state.clone()),
                Json(ForecastRequest { horizon, level: None }),
            )
            .await
            .unwrap();

            assert_eq!(response.0.points.len(), horizon);
            assert_eq!(response.0.horizon, horizon);
        }
    }

    #[tokio::test]
    async fn test_forecast_rejects_bad_horizon() {
        let state = test_state();

        for horizon in [0, MAX_HORIZON + 1] {
            let result = forecast(
                State(state.clone()),
                Json(ForecastRequest { horizon, level: None }),
            )
            .await;

            let (status, _) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_forecast_dates_continue_history() {
        let state = test_state();

        let response = forecast(
            State(state.clone()),
            Json(ForecastRequest { horizon: 3, level: None }),
        )
        .await
        .unwrap();

        let expected_start = state.artifact.last_date() + chrono::Days::new(1);
        assert_eq!(response.0.points[0].date, expected_start);
        assert!(response.0.points.windows(2).all(|w| w[1].date > w[0].date));
    }

    #[tokio::test]
    async fn test_history_trailing_window() {
        let state = test_state();

        let full = history(State(state.clone()), Query(HistoryParams { days: None })).await;
        assert_eq!(full.0.series.len(), 56);

        let tail = history(State(state.clone()), Query(HistoryParams { days: Some(14) })).await;
        assert_eq!(tail.0.series.len(), 14);
        assert_eq!(tail.0.series.last().unwrap().date, state.artifact.last_date());
    }

    #[tokio::test]
    async fn test_summary_totals_match_history() {
        let state = test_state();

        let summary = summary(State(state.clone())).await.unwrap();
        let expected: f64 = state.artifact.history().iter().map(|p| p.total).sum();

        assert!((summary.0.total_revenue - expected).abs() < 1e-9);
        assert_eq!(summary.0.days, 56);
    }
}
