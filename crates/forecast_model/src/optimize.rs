//! Nelder-Mead simplex minimization for coefficient estimation.
//!
//! Derivative-free and fully deterministic: the same objective and
//! starting point always walk the same simplex path, which keeps
//! training reproducible.

use std::cmp::Ordering;

/// Search configuration. The defaults follow the standard
/// reflection/expansion/contraction/shrink coefficients.
#[derive(Debug, Clone)]
pub struct SimplexConfig {
    pub max_iter: usize,
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Relative step used to build the initial simplex
    pub initial_step: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct SimplexResult {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimizes `objective` starting from `initial`, clamping every
/// candidate point to `bounds`.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    config: &SimplexConfig,
) -> SimplexResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return SimplexResult {
            point: Vec::new(),
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    // Initial simplex: the starting point plus one perturbed vertex per
    // dimension.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp_point(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp_point(vertex, bounds));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

        let best = order[0];
        let second_worst = order[n - 1];
        let worst = order[n];

        if values[worst] - values[best] < config.tolerance {
            converged = true;
            break;
        }

        let centroid = centroid_excluding(&simplex, worst);

        // Reflection
        let reflected = clamp_point(
            combine(&centroid, &simplex[worst], -config.alpha),
            bounds,
        );
        let reflected_value = objective(&reflected);

        if reflected_value < values[second_worst] && reflected_value >= values[best] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        if reflected_value < values[best] {
            // Expansion
            let expanded = clamp_point(combine(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = objective(&expanded);

            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        // Contraction, outside or inside of the worst vertex
        let toward = if reflected_value < values[worst] {
            &reflected
        } else {
            &simplex[worst]
        };
        let contracted = clamp_point(combine(&centroid, toward, config.rho), bounds);
        let contracted_value = objective(&contracted);

        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        // Shrink everything toward the best vertex
        let anchor = simplex[best].clone();
        for (i, vertex) in simplex.iter_mut().enumerate() {
            if i == best {
                continue;
            }
            for (x, a) in vertex.iter_mut().zip(anchor.iter()) {
                *x = a + config.sigma * (*x - a);
            }
            *vertex = clamp_point(vertex.clone(), bounds);
            values[i] = objective(vertex);
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map_or(0, |(i, _)| i);

    SimplexResult {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

/// Centroid of all vertices except `exclude`.
fn centroid_excluding(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; n];

    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, x) in centroid.iter_mut().zip(vertex.iter()) {
            *c += x;
        }
    }

    for c in &mut centroid {
        *c /= count;
    }
    centroid
}

/// `centroid + factor * (point - centroid)`.
fn combine(centroid: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(c, p)| c + factor * (p - c))
        .collect()
}

fn clamp_point(mut point: Vec<f64>, bounds: &[(f64, f64)]) -> Vec<f64> {
    for (x, (lo, hi)) in point.iter_mut().zip(bounds.iter()) {
        *x = x.clamp(*lo, *hi);
    }
    point
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const FREE: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

    #[test]
    fn minimize_quadratic() {
        let result = minimize(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            &[FREE, FREE],
            &SimplexConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.point[1], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn minimize_respects_bounds() {
        let result = minimize(
            |x| (x[0] - 5.0).powi(2),
            &[0.0],
            &[(-1.0, 1.0)],
            &SimplexConfig::default(),
        );

        assert!(result.point[0] <= 1.0);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn minimize_is_deterministic() {
        let run = || {
            minimize(
                |x| (x[0] - 1.5).powi(2) + 0.5 * (x[1] + 0.5).powi(2),
                &[0.2, 0.2],
                &[FREE, FREE],
                &SimplexConfig::default(),
            )
        };

        let a = run();
        let b = run();
        assert_eq!(a.point, b.point);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn minimize_empty_input() {
        let result = minimize(|_| 0.0, &[], &[], &SimplexConfig::default());
        assert!(!result.converged);
        assert!(result.point.is_empty());
    }
}
