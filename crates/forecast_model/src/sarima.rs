//! Seasonal ARIMA fitting and forecasting.
//!
//! Estimation is conditional least squares: the series is seasonally and
//! regularly differenced, then intercept and AR/MA coefficients (with
//! the multiplicative seasonal lag structure) are chosen to minimize the
//! one-step squared residuals via Nelder-Mead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::{difference, integrate, seasonal_difference, seasonal_integrate};
use crate::error::ModelError;
use crate::optimize::{SimplexConfig, minimize};
use crate::stats::{mean, quantile_normal};

/// Coefficient bound keeping the AR/MA polynomials away from the unit
/// circle.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Model orders: (p,d,q) non-seasonal, (P,D,Q) seasonal, and the
/// seasonal period in observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaSpec {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl SarimaSpec {
    /// Builds a spec from `(p,d,q)`, `(P,D,Q)` and the period.
    #[must_use]
    pub const fn new(order: (usize, usize, usize), seasonal: (usize, usize, usize), period: usize) -> Self {
        Self {
            p: order.0,
            d: order.1,
            q: order.2,
            seasonal_p: seasonal.0,
            seasonal_d: seasonal.1,
            seasonal_q: seasonal.2,
            period,
        }
    }

    /// The standard starting point for daily data with weekly
    /// seasonality: SARIMA(1,1,1)(1,1,0)[7].
    #[must_use]
    pub const fn daily_weekly() -> Self {
        Self::new((1, 1, 1), (1, 1, 0), 7)
    }

    /// Number of estimated parameters (coefficients plus intercept).
    #[must_use]
    pub const fn num_params(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q + 1
    }

    /// Observations consumed before one-step residuals exist on the
    /// differenced scale (the deepest AR or MA lag, including the
    /// multiplicative cross terms).
    #[must_use]
    pub const fn warmup(&self) -> usize {
        let ar_depth = self.p + self.period * self.seasonal_p;
        let ma_depth = self.q + self.period * self.seasonal_q;
        if ar_depth > ma_depth { ar_depth } else { ma_depth }
    }

    /// Minimum series length this spec can be fitted on.
    #[must_use]
    pub const fn min_observations(&self) -> usize {
        self.d + self.period * self.seasonal_d + self.warmup() + 2
    }

    fn validate(&self) -> Result<(), ModelError> {
        let seasonal = self.seasonal_p > 0 || self.seasonal_d > 0 || self.seasonal_q > 0;
        if seasonal && self.period < 2 {
            return Err(ModelError::InvalidParameter(format!(
                "seasonal orders require a period of at least 2, got {}",
                self.period
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SarimaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
        )
    }
}

/// Point forecasts with confidence bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBands {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// A fitted seasonal ARIMA model.
///
/// Carries the training series and one-step residuals so forecasting and
/// the serving surface need nothing beyond the deserialized struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sarima {
    spec: SarimaSpec,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
    /// Training series on the original scale.
    observations: Vec<f64>,
    /// One-step residuals on the differenced scale, zero during warmup.
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    bic: f64,
}

impl Sarima {
    /// Fits the model to `values` by conditional least squares.
    ///
    /// Deterministic: the same series and spec always produce the same
    /// coefficients and forecasts.
    ///
    /// # Errors
    ///
    /// Returns an error if the model orders are inconsistent, the series is empty
    /// or too short for the requested orders, or contains non-finite
    /// values.
    pub fn fit(spec: SarimaSpec, values: &[f64]) -> Result<Self, ModelError> {
        spec.validate()?;

        if values.is_empty() {
            return Err(ModelError::EmptyData);
        }
        let needed = spec.min_observations();
        if values.len() < needed {
            return Err(ModelError::InsufficientData {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter(
                "series contains non-finite values".to_string(),
            ));
        }

        let transformed = transform(&spec, values);

        // Starting point: intercept at the differenced mean, small
        // positive coefficients.
        let k = spec.num_params();
        let mut initial = vec![0.0; k];
        initial[0] = mean(&transformed);
        for (offset, value) in initial.iter_mut().enumerate().skip(1) {
            *value = 0.1 / offset as f64;
        }

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.resize(k, (-COEFFICIENT_BOUND, COEFFICIENT_BOUND));

        let result = minimize(
            |params| css_objective(&spec, &transformed, params),
            &initial,
            &bounds,
            &SimplexConfig::default(),
        );

        let coefficients = Coefficients::split(&spec, &result.point);
        let centered: Vec<f64> = transformed.iter().map(|v| v - coefficients.intercept).collect();
        let residuals = one_step_residuals(&spec, &centered, &coefficients);

        let warmup = spec.warmup();
        let n_eff = residuals.len().saturating_sub(warmup).max(1);
        let residual_variance =
            residuals[warmup..].iter().map(|r| r * r).sum::<f64>() / n_eff as f64;

        // Gaussian log-likelihood under the CSS variance estimate; the
        // floor keeps a perfect fit from producing infinities.
        let n_eff = n_eff as f64;
        let k = k as f64;
        let log_likelihood = -0.5
            * n_eff
            * (1.0 + residual_variance.max(1e-12).ln() + (2.0 * std::f64::consts::PI).ln());
        let aic = 2.0f64.mul_add(k, -2.0 * log_likelihood);
        let bic = n_eff.ln().mul_add(k, -2.0 * log_likelihood);

        Ok(Self {
            spec,
            intercept: coefficients.intercept,
            ar: coefficients.ar.to_vec(),
            ma: coefficients.ma.to_vec(),
            seasonal_ar: coefficients.seasonal_ar.to_vec(),
            seasonal_ma: coefficients.seasonal_ma.to_vec(),
            observations: values.to_vec(),
            residuals,
            residual_variance,
            aic,
            bic,
        })
    }

    /// Produces `horizon` point forecasts on the original scale.
    ///
    /// The recursion runs on the differenced scale with future shocks at
    /// zero, then integrates back through the regular and seasonal
    /// differences.
    #[must_use]
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return Vec::new();
        }

        let coefficients = self.coefficients();
        let seasonally_differenced =
            seasonal_difference(&self.observations, self.spec.seasonal_d, self.spec.period);
        let transformed = difference(&seasonally_differenced, self.spec.d);

        let mut centered: Vec<f64> =
            transformed.iter().map(|v| v - self.intercept).collect();
        let mut shocks = self.residuals.clone();
        let observed = centered.len();

        for _ in 0..horizon {
            let t = centered.len();
            let next = predict_at(&self.spec, &centered, &shocks, t, &coefficients);
            centered.push(next);
            shocks.push(0.0);
        }

        let forecast_transformed: Vec<f64> =
            centered[observed..].iter().map(|v| v + self.intercept).collect();

        let forecast_seasonal = integrate(&forecast_transformed, &seasonally_differenced, self.spec.d);
        seasonal_integrate(
            &forecast_seasonal,
            &self.observations,
            self.spec.seasonal_d,
            self.spec.period,
        )
    }

    /// Point forecasts with symmetric normal-approximation intervals at
    /// the given confidence `level` (e.g. 0.95). Interval width grows
    /// with the forecast step.
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is outside `(0, 1)`.
    pub fn forecast_with_intervals(
        &self,
        horizon: usize,
        level: f64,
    ) -> Result<ForecastBands, ModelError> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {level}"
            )));
        }

        let mean = self.forecast(horizon);
        let z = quantile_normal((1.0 + level) / 2.0);

        let mut lower = Vec::with_capacity(mean.len());
        let mut upper = Vec::with_capacity(mean.len());
        for (h, point) in mean.iter().enumerate() {
            let se = (self.residual_variance * (h + 1) as f64).sqrt();
            lower.push(point - z * se);
            upper.push(point + z * se);
        }

        Ok(ForecastBands { mean, lower, upper })
    }

    /// One-step in-sample fit on the original scale, returned as aligned
    /// `(actual, fitted)` tails. One-step residuals are invariant under
    /// differencing, so the fitted value is the actual minus the
    /// residual at that step.
    #[must_use]
    pub fn in_sample_fit(&self) -> (Vec<f64>, Vec<f64>) {
        let offset = self.spec.d + self.spec.period * self.spec.seasonal_d;
        let warmup = self.spec.warmup();

        let mut actual = Vec::new();
        let mut fitted = Vec::new();
        for (t, residual) in self.residuals.iter().enumerate().skip(warmup) {
            let observed = self.observations[t + offset];
            actual.push(observed);
            fitted.push(observed - residual);
        }
        (actual, fitted)
    }

    #[must_use]
    pub fn spec(&self) -> SarimaSpec {
        self.spec
    }

    /// Training series on the original scale.
    #[must_use]
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    #[must_use]
    pub fn ar(&self) -> &[f64] {
        &self.ar
    }

    #[must_use]
    pub fn ma(&self) -> &[f64] {
        &self.ma
    }

    #[must_use]
    pub fn seasonal_ar(&self) -> &[f64] {
        &self.seasonal_ar
    }

    #[must_use]
    pub fn seasonal_ma(&self) -> &[f64] {
        &self.seasonal_ma
    }

    #[must_use]
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    #[must_use]
    pub fn aic(&self) -> f64 {
        self.aic
    }

    #[must_use]
    pub fn bic(&self) -> f64 {
        self.bic
    }

    fn coefficients(&self) -> Coefficients<'_> {
        Coefficients {
            intercept: self.intercept,
            ar: &self.ar,
            ma: &self.ma,
            seasonal_ar: &self.seasonal_ar,
            seasonal_ma: &self.seasonal_ma,
        }
    }
}

/// Parameter vector layout: `[intercept | ar | ma | seasonal_ar | seasonal_ma]`.
struct Coefficients<'a> {
    intercept: f64,
    ar: &'a [f64],
    ma: &'a [f64],
    seasonal_ar: &'a [f64],
    seasonal_ma: &'a [f64],
}

impl<'a> Coefficients<'a> {
    fn split(spec: &SarimaSpec, params: &'a [f64]) -> Self {
        let (p, q, sp) = (spec.p, spec.q, spec.seasonal_p);
        Self {
            intercept: params[0],
            ar: &params[1..1 + p],
            ma: &params[1 + p..1 + p + q],
            seasonal_ar: &params[1 + p + q..1 + p + q + sp],
            seasonal_ma: &params[1 + p + q + sp..],
        }
    }
}

/// Applies seasonal then regular differencing.
fn transform(spec: &SarimaSpec, values: &[f64]) -> Vec<f64> {
    let seasonally_differenced = seasonal_difference(values, spec.seasonal_d, spec.period);
    difference(&seasonally_differenced, spec.d)
}

/// Conditional sum of squares for a candidate parameter vector.
fn css_objective(spec: &SarimaSpec, transformed: &[f64], params: &[f64]) -> f64 {
    let coefficients = Coefficients::split(spec, params);
    let centered: Vec<f64> = transformed.iter().map(|v| v - coefficients.intercept).collect();
    let residuals = one_step_residuals(spec, &centered, &coefficients);

    let css: f64 = residuals[spec.warmup()..].iter().map(|r| r * r).sum();
    if css.is_finite() { css } else { f64::MAX }
}

/// One-step residuals on the centered differenced scale; zero during the
/// warmup window.
fn one_step_residuals(spec: &SarimaSpec, centered: &[f64], coefficients: &Coefficients<'_>) -> Vec<f64> {
    let warmup = spec.warmup();
    let mut residuals = vec![0.0; centered.len()];

    for t in warmup..centered.len() {
        let predicted = predict_at(spec, centered, &residuals, t, coefficients);
        residuals[t] = centered[t] - predicted;
    }
    residuals
}

/// One-step prediction at index `t` from the multiplicative
/// `(1 - phi B)(1 - Phi B^m)` / `(1 + theta B)(1 + Theta B^m)` structure.
/// Requires `t >= spec.warmup()`.
fn predict_at(
    spec: &SarimaSpec,
    centered: &[f64],
    shocks: &[f64],
    t: usize,
    coefficients: &Coefficients<'_>,
) -> f64 {
    let m = spec.period;
    let mut predicted = 0.0;

    for (i, phi) in coefficients.ar.iter().enumerate() {
        predicted += phi * centered[t - 1 - i];
    }
    for (j, sphi) in coefficients.seasonal_ar.iter().enumerate() {
        predicted += sphi * centered[t - m * (j + 1)];
    }
    for (i, phi) in coefficients.ar.iter().enumerate() {
        for (j, sphi) in coefficients.seasonal_ar.iter().enumerate() {
            predicted -= phi * sphi * centered[t - 1 - i - m * (j + 1)];
        }
    }

    for (i, theta) in coefficients.ma.iter().enumerate() {
        predicted += theta * shocks[t - 1 - i];
    }
    for (j, stheta) in coefficients.seasonal_ma.iter().enumerate() {
        predicted += stheta * shocks[t - m * (j + 1)];
    }
    for (i, theta) in coefficients.ma.iter().enumerate() {
        for (j, stheta) in coefficients.seasonal_ma.iter().enumerate() {
            predicted += theta * stheta * shocks[t - 1 - i - m * (j + 1)];
        }
    }

    predicted
}
