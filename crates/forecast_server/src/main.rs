//! HTTP surface over a trained sales forecasting model.
//!
//! Loads a model artifact at startup and serves the training history,
//! summary KPIs, and on-demand forecasts. The model is read-only shared
//! state; there is no caching and no session handling.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use clap::Parser;
use forecast_model::ModelArtifact;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;

/// Forecast serving for the sales insight toolchain.
#[derive(Parser)]
#[command(name = "forecast-server")]
#[command(about = "Serves sales history and SARIMA forecasts over HTTP")]
#[command(version)]
struct Cli {
    /// Path to the model artifact produced by `sales-forecast train`
    #[arg(long, env = "MODEL_PATH")]
    model_path: PathBuf,

    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    artifact: Arc<ModelArtifact>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug,tower_http=debug")
    } else {
        EnvFilter::new("info,tower_http=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let artifact = ModelArtifact::load(&cli.model_path)
        .with_context(|| format!("Failed to load model artifact from {}", cli.model_path.display()))?;

    info!(
        model = %artifact.model_name,
        spec = %artifact.model.spec(),
        observations = artifact.model.observations().len(),
        "Model artifact loaded"
    );

    let state = AppState {
        artifact: Arc::new(artifact),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/history", get(routes::history))
        .route("/api/v1/summary", get(routes::summary))
        .route("/api/v1/forecast", post(routes::forecast))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid HOST:PORT configuration")?;

    info!(%addr, "forecast-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
