//! Repository for the raw staging table.

use retail_structs::RawTransaction;
use sqlx::{PgPool, QueryBuilder};

/// Rows per multi-row INSERT, keeping bind counts (8 per row) well under
/// the Postgres limit.
const INSERT_CHUNK: usize = 1000;

/// Repository for `raw_retail_sales` operations.
pub struct RawSalesRepository;

impl RawSalesRepository {
    /// Appends transactions to the staging table in batched inserts.
    ///
    /// Append-only by design: nothing deduplicates against rows from
    /// earlier runs. A mid-batch failure aborts without rolling back the
    /// chunks already written.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn insert_batch(
        pool: &PgPool,
        transactions: &[RawTransaction],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for chunk in transactions.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::new(
                "INSERT INTO raw_retail_sales \
                 (invoice_no, stock_code, description, quantity, unit_price, \
                  invoice_timestamp, customer_id, country) ",
            );

            builder.push_values(chunk, |mut row, tx| {
                row.push_bind(&tx.invoice_no)
                    .push_bind(&tx.stock_code)
                    .push_bind(&tx.description)
                    .push_bind(tx.quantity)
                    .push_bind(tx.unit_price)
                    .push_bind(tx.invoice_timestamp)
                    .push_bind(tx.customer_id)
                    .push_bind(&tx.country);
            });

            let result = builder.build().execute(pool).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Counts rows in the staging table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM raw_retail_sales")
            .fetch_one(pool)
            .await
    }

    /// Empties the staging table. Operator escape hatch for re-loads;
    /// never called implicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn truncate(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE raw_retail_sales")
            .execute(pool)
            .await?;
        Ok(())
    }
}
