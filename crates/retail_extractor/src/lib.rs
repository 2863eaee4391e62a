//! Extractor for the retail transactions source file.
//!
//! Reads the flat CSV export, coerces each column to its declared type,
//! and drops rows that fail coercion. Dropped rows are counted, not
//! errors: only a structurally broken file (unreadable, missing columns)
//! aborts the extraction.

use std::path::Path;

use chrono::NaiveDateTime;
use retail_structs::RawTransaction;

/// Timestamp formats seen in the source exports. The original dataset
/// uses `12/1/2010 8:26`; re-exports from other tools use ISO-ish forms.
const TIMESTAMP_FORMATS: &[&str] = &["%m/%d/%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source file is missing expected column '{0}'")]
    MissingColumn(&'static str),
}

/// Result of one extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Rows that survived type coercion, in file order.
    pub transactions: Vec<RawTransaction>,
    /// Total data rows read from the file.
    pub rows_read: usize,
    /// Rows discarded because a column failed coercion.
    pub rows_dropped: usize,
}

/// Positions of the expected columns within the source header.
struct ColumnIndex {
    invoice_no: usize,
    stock_code: usize,
    description: usize,
    quantity: usize,
    unit_price: usize,
    invoice_date: usize,
    customer_id: usize,
    country: usize,
}

impl ColumnIndex {
    /// Resolves columns by name, tolerating case and embedded spaces
    /// ("Invoice No" and "INVOICENO" both match).
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ExtractError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.to_uppercase().replace(' ', "") == name)
                .ok_or(ExtractError::MissingColumn(name))
        };

        Ok(Self {
            invoice_no: find("INVOICENO")?,
            stock_code: find("STOCKCODE")?,
            description: find("DESCRIPTION")?,
            quantity: find("QUANTITY")?,
            unit_price: find("UNITPRICE")?,
            invoice_date: find("INVOICEDATE")?,
            customer_id: find("CUSTOMERID")?,
            country: find("COUNTRY")?,
        })
    }
}

/// Extracts all parseable transactions from a source CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its header does not
/// contain the expected columns. Individual malformed rows are dropped
/// and counted in the returned [`Extraction`].
pub fn extract_transactions(path: &Path) -> Result<Extraction, ExtractError> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut transactions = Vec::new();
    let mut rows_read = 0;
    let mut rows_dropped = 0;

    for record in reader.records() {
        rows_read += 1;

        // A row with the wrong field count is malformed data, not a
        // broken file: drop it like any other coercion failure.
        let record = match record {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                rows_dropped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match coerce_record(&record, &columns) {
            Some(transaction) => transactions.push(transaction),
            None => rows_dropped += 1,
        }
    }

    Ok(Extraction {
        transactions,
        rows_read,
        rows_dropped,
    })
}

/// Coerces a single CSV record, returning `None` when any column fails.
fn coerce_record(record: &csv::StringRecord, columns: &ColumnIndex) -> Option<RawTransaction> {
    let field = |idx: usize| record.get(idx).map(str::trim);

    let invoice_no = non_empty(field(columns.invoice_no)?)?.to_string();
    let stock_code = non_empty(field(columns.stock_code)?)?.to_string();
    let description = field(columns.description)
        .and_then(non_empty)
        .map(ToString::to_string);
    let quantity: i32 = field(columns.quantity)?.parse().ok()?;
    let unit_price: f64 = field(columns.unit_price)?.parse().ok()?;
    let invoice_timestamp = parse_timestamp(field(columns.invoice_date)?)?;
    let customer_id = parse_customer_id(field(columns.customer_id)?)?;
    let country = non_empty(field(columns.country)?)?.to_string();

    if !unit_price.is_finite() {
        return None;
    }

    Some(RawTransaction {
        invoice_no,
        stock_code,
        description,
        quantity,
        unit_price,
        invoice_timestamp,
        customer_id,
        country,
    })
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parses a customer id, tolerating the `17850.0` form that spreadsheet
/// round-trips produce for integer columns.
fn parse_customer_id(value: &str) -> Option<i32> {
    if value.is_empty() {
        return None;
    }

    if let Ok(id) = value.parse::<i32>() {
        return Some(id);
    }

    let as_float: f64 = value.parse().ok()?;
    if as_float.fract() == 0.0 && as_float >= 0.0 && as_float <= f64::from(i32::MAX) {
        return Some(as_float as i32);
    }

    None
}
