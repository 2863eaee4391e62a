//! Differencing and integration for SARIMA preprocessing.

/// Applies regular differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Applies seasonal differencing `d` times with the given period.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Reverses regular differencing for a forecast continuation.
///
/// `forecast` continues the `d`-times differenced version of `base`; the
/// result continues `base` itself. Each level is undone by cumulative
/// summation from the last observed value at that level.
pub fn integrate(forecast: &[f64], base: &[f64], d: usize) -> Vec<f64> {
    let mut result = forecast.to_vec();

    for level in (0..d).rev() {
        let last = difference(base, level).last().copied().unwrap_or(0.0);

        let mut cumsum = last;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }

    result
}

/// Reverses seasonal differencing for a forecast continuation.
///
/// Forecast steps beyond one period feed on previously integrated
/// forecast values, so the seasonal pattern propagates through the whole
/// horizon.
pub fn seasonal_integrate(forecast: &[f64], base: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return forecast.to_vec();
    }

    let mut result = forecast.to_vec();

    for level in (0..d).rev() {
        let mut history = seasonal_difference(base, level, period);
        if history.len() < period {
            return result;
        }

        for value in &mut result {
            let prev = history[history.len() - period];
            let next = *value + prev;
            history.push(next);
            *value = next;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn difference_order_1() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn difference_order_2() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_order_0_is_identity() {
        let series = vec![5.0, 7.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn seasonal_difference_removes_stable_pattern() {
        let series = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        assert_eq!(seasonal_difference(&series, 1, 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn seasonal_difference_with_yearly_growth() {
        let series = vec![
            100.0, 120.0, 80.0, 90.0, // year 1
            110.0, 130.0, 90.0, 100.0, // year 2
        ];
        assert_eq!(seasonal_difference(&series, 1, 4), vec![10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn integrate_reverses_difference() {
        let base = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let continuation = vec![6.0, 7.0];

        let integrated = integrate(&continuation, &base, 1);

        assert_relative_eq!(integrated[0], 30.0, epsilon = 1e-12);
        assert_relative_eq!(integrated[1], 37.0, epsilon = 1e-12);
    }

    #[test]
    fn seasonal_integrate_repeats_pattern() {
        let base = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        // Zero seasonal differences forecasted: pattern should repeat.
        let continuation = vec![0.0; 4];

        let integrated = seasonal_integrate(&continuation, &base, 1, 3);

        assert_eq!(integrated, vec![1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn seasonal_integrate_feeds_on_forecast_values() {
        let base = vec![10.0, 20.0, 10.0, 20.0];
        // Constant +1 seasonal difference: each step is last season + 1.
        let continuation = vec![1.0; 5];

        let integrated = seasonal_integrate(&continuation, &base, 1, 2);

        assert_eq!(integrated, vec![11.0, 21.0, 12.0, 22.0, 13.0]);
    }

    #[test]
    fn round_trip_regular_then_seasonal() {
        // Linear trend plus a weekly pattern: seasonal differencing
        // leaves a constant series, regular differencing leaves zeros.
        let series: Vec<f64> = (0..28)
            .map(|i| 50.0 + f64::from(i) + 10.0 * f64::from(i % 7))
            .collect();

        let ds = seasonal_difference(&series, 1, 7);
        let z = difference(&ds, 1);
        assert!(z.iter().all(|v| v.abs() < 1e-12));

        // A zero continuation of z must reproduce the original pattern.
        let restored = seasonal_integrate(&integrate(&[0.0, 0.0], &ds, 1), &series, 1, 7);

        let expected: Vec<f64> = (28..30)
            .map(|i| 50.0 + f64::from(i) + 10.0 * f64::from(i % 7))
            .collect();
        assert_relative_eq!(restored[0], expected[0], epsilon = 1e-9);
        assert_relative_eq!(restored[1], expected[1], epsilon = 1e-9);
    }
}
