//! In-sample accuracy metrics reported after training.

/// Mean absolute percentage error, in percent.
///
/// Zero-revenue days would blow the ratio up, so actuals equal to zero
/// are skipped; returns `None` when nothing remains (or lengths differ).
#[must_use]
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() != predicted.len() {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        if a.abs() < f64::EPSILON {
            continue;
        }
        sum += ((a - p) / a).abs();
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(100.0 * sum / count as f64)
}

/// Root mean squared error; `NaN` for empty or mismatched inputs.
#[must_use]
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mape_basic() {
        let actual = [100.0, 200.0];
        let predicted = [90.0, 220.0];
        // (10% + 10%) / 2
        assert_relative_eq!(mape(&actual, &predicted).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn mape_skips_zero_actuals() {
        let actual = [0.0, 100.0];
        let predicted = [50.0, 110.0];
        assert_relative_eq!(mape(&actual, &predicted).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn mape_all_zero_actuals() {
        assert!(mape(&[0.0, 0.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn rmse_basic() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [1.0, 2.0, 5.0];
        assert_relative_eq!(rmse(&actual, &predicted), (4.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn rmse_mismatched_lengths() {
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_nan());
    }
}
