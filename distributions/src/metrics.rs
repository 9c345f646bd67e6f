//! Fit-quality indicators shared by the regression models.

/// The evaluation bundle computed for every fitted regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    /// Coefficient of determination; 1.0 is a perfect fit.
    pub r_squared: f64,
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean-square error.
    pub mse: f64,
    /// Mean-absolute error.
    pub mae: f64,
}

/// R² = 1 - SS_res / SS_tot, or 0 when the observed values carry no
/// variance at all.
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> f64 {
    let y_mean = mean(observed);
    let ss_tot: f64 = observed.iter().map(|y| (y - y_mean).powi(2)).sum();
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}

/// MSE = Σ(y - ŷ)² / n.
pub fn mse(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    let sum: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    sum / observed.len() as f64
}

/// RMSE = √MSE.
pub fn rmse(observed: &[f64], predicted: &[f64]) -> f64 {
    mse(observed, predicted).sqrt()
}

/// MAE = Σ|y - ŷ| / n.
pub fn mae(observed: &[f64], predicted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    let sum: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).abs())
        .sum();
    sum / observed.len() as f64
}

/// Computes the whole indicator bundle in one pass over the inputs.
pub fn evaluate(observed: &[f64], predicted: &[f64]) -> RegressionMetrics {
    let mse = mse(observed, predicted);
    RegressionMetrics {
        r_squared: r_squared(observed, predicted),
        rmse: mse.sqrt(),
        mse,
        mae: mae(observed, predicted),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, matching the moments reported for observed data.
pub(crate) fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
