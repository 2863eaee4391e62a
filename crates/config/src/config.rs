use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Context;

/// Default directory for serialized model artifacts.
const DEFAULT_MODEL_DIR: &str = "models";

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::from_env().expect("Failed to create config"));

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Warehouse connection URL
    pub database_url: String,

    /// Directory where model artifacts are written
    pub model_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DATABASE_URL`: `PostgreSQL` connection string for the warehouse
    ///
    /// Optional environment variables:
    /// - `MODEL_DIR`: Directory for model artifacts (default: `models`)
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing.
    fn from_env() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        let model_dir = std::env::var("MODEL_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR), PathBuf::from);

        Ok(Self {
            database_url,
            model_dir,
        })
    }
}
