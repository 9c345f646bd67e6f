//! Least-squares fitting engine for simple linear regression.
//!
//! Three independently implemented estimators are provided; they agree
//! within numeric tolerance on the same data. The closed-form estimator is
//! the production path, the other two exist so their results can be
//! cross-checked against it.

use ndarray::{Array1, Array2};

use crate::error::{ModelError, Result};
use crate::metrics::mean;

/// An estimated regression line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub slope: f64,
    pub intercept: f64,
}

/// Selects which estimator [`fit`] runs.
#[derive(Debug, Clone, Copy)]
pub enum FitMethod {
    /// Closed-form least squares. Cheapest and exact; the production path.
    Analytical,
    /// Normal equations over the design matrix, with a pseudo-inverse
    /// fallback when XᵗX is singular.
    NormalEquations,
    /// Full-batch gradient descent with closed-form MSE gradients.
    /// Deterministic for a fixed learning rate and epoch count.
    GradientDescent { learning_rate: f64, epochs: usize },
}

/// Estimates slope and intercept for `y = slope * x + intercept`.
///
/// With fewer than two samples every method reports a zero line rather than
/// failing.
///
/// # Errors
/// Returns `ModelError::InvalidParameters` if `x` and `y` differ in length.
pub fn fit(x: &[f64], y: &[f64], method: FitMethod) -> Result<Fit> {
    if x.len() != y.len() {
        return Err(ModelError::InvalidParameters(format!(
            "x and y must have the same length, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Ok(Fit {
            slope: 0.0,
            intercept: 0.0,
        });
    }

    Ok(match method {
        FitMethod::Analytical => fit_analytical(x, y),
        FitMethod::NormalEquations => fit_normal_equations(x, y),
        FitMethod::GradientDescent {
            learning_rate,
            epochs,
        } => fit_gradient_descent(x, y, learning_rate, epochs),
    })
}

/// Evaluates the fitted line over `x`.
pub fn predict(fit: Fit, x: &[f64]) -> Vec<f64> {
    x.iter().map(|xi| fit.slope * xi + fit.intercept).collect()
}

/// slope = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)², intercept = ȳ - slope * x̄.
/// A zero denominator (constant x) yields a flat line through ȳ.
fn fit_analytical(x: &[f64], y: &[f64]) -> Fit {
    let x_mean = mean(x);
    let y_mean = mean(y);

    let numerator: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();
    let denominator: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();

    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };

    Fit {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}

/// Solves θ = (XᵗX)⁻¹ Xᵗy over the design matrix X = [x, 1].
fn fit_normal_equations(x: &[f64], y: &[f64]) -> Fit {
    let n = x.len();
    let design = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { x[i] } else { 1.0 });
    let y = Array1::from_vec(y.to_vec());

    let xtx = design.t().dot(&design);
    let xty = design.t().dot(&y);

    let (a, b, d) = (xtx[[0, 0]], xtx[[0, 1]], xtx[[1, 1]]);
    let det = a * d - b * b;
    let scale = (a * d).abs().max(b * b).max(1.0);

    let theta = if det.abs() > f64::EPSILON * scale {
        [
            (d * xty[0] - b * xty[1]) / det,
            (a * xty[1] - b * xty[0]) / det,
        ]
    } else {
        pinv_solve(a, b, d, xty[0], xty[1])
    };

    Fit {
        slope: theta[0],
        intercept: theta[1],
    }
}

/// Minimum-norm solution of the singular symmetric system [[a, b], [b, d]],
/// via the closed-form 2x2 eigendecomposition of the Moore-Penrose
/// pseudo-inverse.
fn pinv_solve(a: f64, b: f64, d: f64, v0: f64, v1: f64) -> [f64; 2] {
    let half_trace = (a + d) / 2.0;
    let radius = (((a - d) / 2.0).powi(2) + b * b).sqrt();
    let eigenvalues = [half_trace + radius, half_trace - radius];
    let tol = 1e-10 * eigenvalues[0].abs().max(1.0);

    let mut theta = [0.0, 0.0];
    for lambda in eigenvalues {
        if lambda.abs() <= tol {
            continue;
        }
        let (ex, ey) = if b.abs() > tol {
            (b, lambda - a)
        } else if (lambda - a).abs() <= (lambda - d).abs() {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };
        let norm = (ex * ex + ey * ey).sqrt();
        let (ex, ey) = (ex / norm, ey / norm);

        let projection = (ex * v0 + ey * v1) / lambda;
        theta[0] += projection * ex;
        theta[1] += projection * ey;
    }
    theta
}

/// Full-batch gradient descent from a zero line, taking `epochs` steps of
/// `-learning_rate * gradient` of the MSE loss:
///
/// ∂L/∂slope = -2/n * Σ x (y - ŷ),  ∂L/∂intercept = -2/n * Σ (y - ŷ).
fn fit_gradient_descent(x: &[f64], y: &[f64], learning_rate: f64, epochs: usize) -> Fit {
    let n = x.len() as f64;
    let mut slope = 0.0;
    let mut intercept = 0.0;

    for _ in 0..epochs {
        let mut grad_slope = 0.0;
        let mut grad_intercept = 0.0;
        for (xi, yi) in x.iter().zip(y) {
            let residual = yi - (slope * xi + intercept);
            grad_slope += xi * residual;
            grad_intercept += residual;
        }
        grad_slope *= -2.0 / n;
        grad_intercept *= -2.0 / n;

        slope -= learning_rate * grad_slope;
        intercept -= learning_rate * grad_intercept;
    }

    Fit { slope, intercept }
}
