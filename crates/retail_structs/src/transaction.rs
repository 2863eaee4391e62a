use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One transactional line item from the retail source file, after type
/// coercion. This is what gets appended verbatim to the raw staging table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTransaction {
    /// Invoice number (kept as text, some exports prefix cancellations with 'C')
    pub invoice_no: String,

    /// Product stock code
    pub stock_code: String,

    /// Product description, missing for some rows
    pub description: Option<String>,

    /// Units sold; negative values are returns
    pub quantity: i32,

    /// Price per unit in sterling
    pub unit_price: f64,

    /// When the invoice was generated
    pub invoice_timestamp: NaiveDateTime,

    /// Customer identifier
    pub customer_id: i32,

    /// Customer country
    pub country: String,
}

/// A row of the analytics table: a valid transaction plus the derived
/// line total. Produced by the warehouse transform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CleanedSale {
    pub invoice_no: String,
    pub stock_code: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: f64,
    pub invoice_timestamp: NaiveDateTime,
    pub customer_id: i32,
    pub country: String,

    /// `quantity * unit_price`, computed by the transform
    pub total_price: f64,
}

impl RawTransaction {
    /// Whether the row would survive the warehouse validity filter
    /// (positive quantity and unit price).
    #[must_use]
    pub fn passes_validity_filter(&self) -> bool {
        self.quantity > 0 && self.unit_price > 0.0
    }

    /// Derives the analytics row for a valid transaction, or `None` when
    /// the validity filter would drop it. Mirrors the warehouse transform
    /// for in-process consumers.
    #[must_use]
    pub fn into_cleaned(self) -> Option<CleanedSale> {
        if !self.passes_validity_filter() {
            return None;
        }

        let total_price = f64::from(self.quantity) * self.unit_price;

        Some(CleanedSale {
            invoice_no: self.invoice_no,
            stock_code: self.stock_code,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            invoice_timestamp: self.invoice_timestamp,
            customer_id: self.customer_id,
            country: self.country,
            total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn transaction(quantity: i32, unit_price: f64) -> RawTransaction {
        RawTransaction {
            invoice_no: "536365".to_string(),
            stock_code: "85123A".to_string(),
            description: Some("WHITE HANGING HEART T-LIGHT HOLDER".to_string()),
            quantity,
            unit_price,
            invoice_timestamp: NaiveDate::from_ymd_opt(2010, 12, 1)
                .unwrap()
                .and_hms_opt(8, 26, 0)
                .unwrap(),
            customer_id: 17850,
            country: "United Kingdom".to_string(),
        }
    }

    #[test]
    fn test_total_price_is_exact_product() {
        let sale = transaction(6, 2.55).into_cleaned().unwrap();
        assert!((sale.total_price - 6.0 * 2.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validity_filter_drops_returns() {
        assert!(transaction(-2, 2.55).into_cleaned().is_none());
        assert!(transaction(0, 2.55).into_cleaned().is_none());
    }

    #[test]
    fn test_validity_filter_drops_free_items() {
        assert!(transaction(3, 0.0).into_cleaned().is_none());
        assert!(transaction(3, -1.0).into_cleaned().is_none());
    }

    #[test]
    fn test_valid_row_survives() {
        assert!(transaction(1, 0.01).into_cleaned().is_some());
    }
}
