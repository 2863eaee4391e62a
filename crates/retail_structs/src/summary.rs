use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DailySalesPoint;

/// Headline figures over a daily revenue series, as shown on the
/// performance dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SalesSummary {
    /// Revenue summed over the whole series
    pub total_revenue: f64,

    /// Number of days covered (including zero-revenue days)
    pub days: usize,

    /// Mean revenue per day
    pub daily_average: f64,

    /// Best-performing day
    pub peak_day: NaiveDate,
    pub peak_revenue: f64,
}

impl SalesSummary {
    /// Computes summary figures for a non-empty series.
    #[must_use]
    pub fn from_series(series: &[DailySalesPoint]) -> Option<Self> {
        let first = series.first()?;

        let total_revenue: f64 = series.iter().map(|p| p.total).sum();
        let peak = series
            .iter()
            .fold(first, |best, p| if p.total > best.total { p } else { best });

        Some(Self {
            total_revenue,
            days: series.len(),
            daily_average: total_revenue / series.len() as f64,
            peak_day: peak.date,
            peak_revenue: peak.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn point(d: u32, total: f64) -> DailySalesPoint {
        DailySalesPoint {
            date: NaiveDate::from_ymd_opt(2011, 6, d).unwrap(),
            total,
        }
    }

    #[test]
    fn test_summary_empty_series() {
        assert!(SalesSummary::from_series(&[]).is_none());
    }

    #[test]
    fn test_summary_figures() {
        let series = vec![point(1, 100.0), point(2, 0.0), point(3, 500.0), point(4, 200.0)];

        let summary = SalesSummary::from_series(&series).unwrap();

        assert_relative_eq!(summary.total_revenue, 800.0, epsilon = 1e-10);
        assert_eq!(summary.days, 4);
        assert_relative_eq!(summary.daily_average, 200.0, epsilon = 1e-10);
        assert_eq!(summary.peak_day, NaiveDate::from_ymd_opt(2011, 6, 3).unwrap());
        assert_relative_eq!(summary.peak_revenue, 500.0, epsilon = 1e-10);
    }
}
