//! Seasonal ARIMA forecasting for daily sales series.
//!
//! Fits a SARIMA(p,d,q)(P,D,Q)[m] model to a univariate series by
//! conditional least squares and produces point forecasts with
//! normal-approximation intervals. Fitted models serialize to a JSON
//! artifact consumed by the CLI and the serving surface.

mod artifact;
mod diff;
mod error;
pub mod metrics;
mod optimize;
mod sarima;
mod stats;

pub use artifact::{ARTIFACT_FORMAT_VERSION, ModelArtifact, TrainingMetrics};
pub use error::ModelError;
pub use sarima::{ForecastBands, Sarima, SarimaSpec};
