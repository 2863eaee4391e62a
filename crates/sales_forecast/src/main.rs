//! E-Commerce Sales Forecasting Pipeline
//!
//! A batch toolchain that extracts retail transactions from a flat file,
//! loads them into a SQL warehouse, derives an analytics table, and
//! trains a seasonal ARIMA model for sales forecasting.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::CONFIG;
use database::{create_pool, run_migrations};
use forecast_model::SarimaSpec;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

/// E-commerce sales ELT and forecasting pipeline
#[derive(Parser)]
#[command(name = "sales-forecast")]
#[command(about = "ELT and SARIMA forecasting for retail sales data")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract transactions from a source CSV and load them into the
    /// raw staging table
    Load {
        /// Path to the source CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Empty the staging table before loading. Without this flag a
        /// re-run appends duplicate rows.
        #[arg(long)]
        truncate: bool,
    },

    /// Rebuild the analytics table from staging with the warehouse
    /// transform
    Transform,

    /// Train the forecasting model on the daily revenue series
    Train {
        /// Name for the model
        #[arg(short, long, default_value = "daily_sales")]
        name: String,

        /// Non-seasonal order as "p,d,q"
        #[arg(long, default_value = "1,1,1")]
        order: String,

        /// Seasonal order as "P,D,Q"
        #[arg(long, default_value = "1,1,0")]
        seasonal: String,

        /// Seasonal period in days
        #[arg(long, default_value = "7")]
        period: usize,
    },

    /// Forecast future sales from a trained model
    Forecast {
        /// Model name to look up in the registry
        #[arg(short, long, default_value = "daily_sales")]
        name: String,

        /// Path to a model artifact (skips the registry lookup)
        #[arg(short, long)]
        model_path: Option<PathBuf>,

        /// Number of days to forecast
        #[arg(long, default_value = "30")]
        horizon: usize,

        /// Confidence level for the interval bands
        #[arg(long, default_value = "0.95")]
        level: f64,
    },

    /// List trained models registered in the warehouse
    Models {
        /// Model name to list versions for
        #[arg(short, long, default_value = "daily_sales")]
        name: String,
    },

    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool = create_pool(&CONFIG.database_url).await?;

    match cli.command {
        Commands::Load { file, truncate } => {
            commands::load::run(&pool, &file, truncate).await?;
        }
        Commands::Transform => {
            commands::transform::run(&pool).await?;
        }
        Commands::Train {
            name,
            order,
            seasonal,
            period,
        } => {
            let spec = SarimaSpec::new(
                commands::train::parse_order(&order)?,
                commands::train::parse_order(&seasonal)?,
                period,
            );
            commands::train::run(&pool, &name, spec).await?;
        }
        Commands::Forecast {
            name,
            model_path,
            horizon,
            level,
        } => {
            commands::forecast::run(&pool, &name, model_path.as_deref(), horizon, level).await?;
        }
        Commands::Models { name } => {
            commands::models::run(&pool, &name).await?;
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            info!("Migrations completed successfully");
        }
    }

    Ok(())
}
