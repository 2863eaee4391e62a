//! Repository for the analytics table and the warehouse transform.

use retail_structs::DailySalesPoint;
use sqlx::PgPool;

use crate::models::DailyRevenueRow;

/// The warehouse transform: one declarative statement deriving the
/// analytics table from staging. Filters rows failing the validity
/// predicates and computes the line total.
pub const TRANSFORM_SALES_SQL: &str = "\
INSERT INTO sales_cleaned \
    (invoice_no, stock_code, description, quantity, unit_price, \
     invoice_timestamp, customer_id, country, total_price) \
SELECT \
    invoice_no, stock_code, description, quantity, unit_price, \
    invoice_timestamp, customer_id, country, \
    quantity * unit_price AS total_price \
FROM raw_retail_sales \
WHERE customer_id IS NOT NULL \
  AND quantity > 0 \
  AND unit_price > 0";

/// Daily revenue aggregation for the trainer. The source dataset covers
/// 2010-2011; timestamps outside the window are data-entry artifacts and
/// are excluded before resampling.
const DAILY_REVENUE_SQL: &str = "\
SELECT invoice_timestamp::date AS day, SUM(total_price) AS revenue \
FROM sales_cleaned \
WHERE invoice_timestamp >= DATE '2009-01-01' \
  AND invoice_timestamp < DATE '2013-01-01' \
GROUP BY day \
ORDER BY day";

/// Repository for `sales_cleaned` operations.
pub struct CleanedSalesRepository;

impl CleanedSalesRepository {
    /// Rebuilds the analytics table: truncates it, then runs the
    /// transform statement. Returns the number of rows produced.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn rebuild(pool: &PgPool) -> Result<u64, sqlx::Error> {
        sqlx::query("TRUNCATE sales_cleaned").execute(pool).await?;

        let result = sqlx::query(TRANSFORM_SALES_SQL).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Counts rows in the analytics table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sales_cleaned")
            .fetch_one(pool)
            .await
    }

    /// Fetches the daily revenue series, sorted by day. Calendar gaps
    /// are left to the caller (`retail_structs::fill_daily_gaps`).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn daily_revenue(pool: &PgPool) -> Result<Vec<DailySalesPoint>, sqlx::Error> {
        let rows: Vec<DailyRevenueRow> = sqlx::query_as(DAILY_REVENUE_SQL).fetch_all(pool).await?;
        Ok(rows.into_iter().map(DailySalesPoint::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_computes_line_total() {
        assert!(TRANSFORM_SALES_SQL.contains("quantity * unit_price AS total_price"));
    }

    #[test]
    fn test_transform_filters_invalid_rows() {
        assert!(TRANSFORM_SALES_SQL.contains("customer_id IS NOT NULL"));
        assert!(TRANSFORM_SALES_SQL.contains("quantity > 0"));
        assert!(TRANSFORM_SALES_SQL.contains("unit_price > 0"));
    }

    #[test]
    fn test_transform_is_a_single_statement() {
        // The transform contract is one declarative statement.
        assert!(!TRANSFORM_SALES_SQL.contains(';'));
    }

    #[test]
    fn test_daily_revenue_is_sorted_and_windowed() {
        assert!(DAILY_REVENUE_SQL.contains("ORDER BY day"));
        assert!(DAILY_REVENUE_SQL.contains("DATE '2009-01-01'"));
        assert!(DAILY_REVENUE_SQL.contains("DATE '2013-01-01'"));
    }
}
