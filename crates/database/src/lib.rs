//! Warehouse access for the sales pipeline: connection pool, migrations,
//! and repositories for the staging, analytics, and model-registry tables.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

mod cleaned_sales;
mod model_registry;
mod models;
mod raw_sales;

pub use cleaned_sales::{CleanedSalesRepository, TRANSFORM_SALES_SQL};
pub use model_registry::ModelRepository;
pub use models::{CreateModelRecord, ModelRecord};
pub use raw_sales::RawSalesRepository;

/// Creates a connection pool to the `PostgreSQL` warehouse.
///
/// # Errors
///
/// Returns an error if the connection to the database fails.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Runs all pending migrations.
///
/// # Errors
///
/// Returns an error if running migrations fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
