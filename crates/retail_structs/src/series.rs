use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Revenue for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DailySalesPoint {
    pub date: NaiveDate,
    pub total: f64,
}

/// Fills calendar gaps in a daily revenue series with zero-revenue days.
///
/// The input must be sorted by date with at most one point per day (the
/// aggregation query guarantees both). Days with no invoices simply do
/// not appear in the warehouse output, but the forecaster needs one value
/// per period.
#[must_use]
pub fn fill_daily_gaps(points: &[DailySalesPoint]) -> Vec<DailySalesPoint> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    let mut filled = Vec::new();
    let mut next = points.iter();
    let mut pending = next.next();
    let mut day = first.date;

    while day <= last.date {
        match pending {
            Some(point) if point.date == day => {
                filled.push(*point);
                pending = next.next();
            }
            _ => filled.push(DailySalesPoint { date: day, total: 0.0 }),
        }

        let Some(following) = day.checked_add_days(Days::new(1)) else {
            break;
        };
        day = following;
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 3, d).unwrap()
    }

    #[test]
    fn test_fill_daily_gaps_empty() {
        assert!(fill_daily_gaps(&[]).is_empty());
    }

    #[test]
    fn test_fill_daily_gaps_contiguous_unchanged() {
        let points = vec![
            DailySalesPoint { date: day(1), total: 100.0 },
            DailySalesPoint { date: day(2), total: 250.0 },
        ];
        assert_eq!(fill_daily_gaps(&points), points);
    }

    #[test]
    fn test_fill_daily_gaps_inserts_zero_days() {
        let points = vec![
            DailySalesPoint { date: day(1), total: 100.0 },
            DailySalesPoint { date: day(4), total: 400.0 },
        ];

        let filled = fill_daily_gaps(&points);

        assert_eq!(filled.len(), 4);
        assert_eq!(filled[1].date, day(2));
        assert!(filled[1].total.abs() < f64::EPSILON);
        assert!(filled[2].total.abs() < f64::EPSILON);
        assert_eq!(filled[3].date, day(4));
    }

    #[test]
    fn test_fill_daily_gaps_stays_sorted() {
        let points = vec![
            DailySalesPoint { date: day(5), total: 10.0 },
            DailySalesPoint { date: day(9), total: 20.0 },
            DailySalesPoint { date: day(12), total: 30.0 },
        ];

        let filled = fill_daily_gaps(&points);

        assert_eq!(filled.len(), 8);
        assert!(filled.windows(2).all(|w| w[0].date < w[1].date));
    }
}
