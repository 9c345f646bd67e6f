//! Simple linear regression over synthetic, reproducibly generated data.
//!
//! Each request draws a fresh dataset from a generator seeded with a fixed
//! value, fits a line to it with the closed-form estimator, and returns the
//! true curve, the noisy observations, the fitted line, and the fit-quality
//! indicators.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::curve::CurveData;
use crate::descriptor::{Category, ModelDescriptor, ModelType, ParameterSchema};
use crate::error::{ModelError, Result};
use crate::metrics::{self, mean, population_variance};
use crate::regression::{self, FitMethod};

/// Identical requests must produce bit-identical responses, so every
/// computation seeds its own generator with this value.
const SEED: u64 = 42;

/// Explanatory values are drawn uniformly from this interval.
const X_LOW: f64 = -5.0;
const X_HIGH: f64 = 5.0;

/// Fraction of samples turned into outliers by pattern 2.
const OUTLIER_FRACTION: f64 = 0.1;

const DEFAULT_SLOPE: f64 = 1.0;
const DEFAULT_NOISE_STD: f64 = 1.0;
const DEFAULT_PATTERN: f64 = 0.0;

/// The generative intercept is fixed at zero and deliberately not exposed
/// as a tunable parameter.
const TRUE_INTERCEPT: f64 = 0.0;

pub(crate) fn descriptor() -> Result<ModelDescriptor> {
    ModelDescriptor::new(
        ModelType::LinearRegression,
        "Simple linear regression",
        "Least-squares regression over synthetic data. Adjust the generating \
         slope, the noise level, and the data pattern to see how the fitted \
         line reacts.",
        Category::MlRegression,
        &["regression", "machine learning", "statistics"],
        r"y = ax + b + \epsilon, \quad \epsilon \sim N(0, \sigma^2)",
        None,
        vec![
            ParameterSchema::new(
                "slope",
                "Slope (a)",
                "Slope of the true generating line.",
                DEFAULT_SLOPE,
                -5.0,
                5.0,
                0.1,
            )?,
            ParameterSchema::new(
                "noise_std",
                "Noise (σ)",
                "Standard deviation of the observation noise.",
                DEFAULT_NOISE_STD,
                0.1,
                5.0,
                0.1,
            )?,
            ParameterSchema::new(
                "pattern_id",
                "Data pattern",
                "0: linear, 1: quadratic, 2: with outliers.",
                DEFAULT_PATTERN,
                0.0,
                2.0,
                1.0,
            )?,
        ],
    )
}

pub(crate) fn compute(params: &BTreeMap<String, f64>, sample_count: usize) -> Result<CurveData> {
    let slope = params.get("slope").copied().unwrap_or(DEFAULT_SLOPE);
    let noise_std = params.get("noise_std").copied().unwrap_or(DEFAULT_NOISE_STD);
    let pattern_id = params.get("pattern_id").copied().unwrap_or(DEFAULT_PATTERN);
    calculate(slope, noise_std, pattern_id, sample_count)
}

/// Generates the synthetic dataset, fits it analytically, and assembles the
/// regression-mode curve result.
///
/// # Errors
/// Returns `ModelError::InvalidParameters` if `noise_std <= 0`.
pub fn calculate(
    slope: f64,
    noise_std: f64,
    pattern_id: f64,
    sample_count: usize,
) -> Result<CurveData> {
    let (x, y_true, y_observed) = generate(slope, noise_std, pattern_id, sample_count)?;

    let fit = regression::fit(&x, &y_observed, FitMethod::Analytical)?;
    let y_fitted = regression::predict(fit, &x);
    let metrics = metrics::evaluate(&y_observed, &y_fitted);

    let y_mean = mean(&y_observed);
    let y_variance = population_variance(&y_observed);

    CurveData::regression(
        x,
        y_true,
        y_observed,
        y_fitted,
        fit,
        &metrics,
        y_mean,
        y_variance,
        y_variance.sqrt(),
    )
}

/// Draws `(x, y_true, y_observed)` for the requested pattern.
///
/// Patterns: 0 draws observations around the true line, 1 adds a 0.5·x²
/// bend to the truth, 2 perturbs ⌊n/10⌋ distinct observations by
/// ±(5σ + 5). Any unknown id falls back to pattern 0.
pub fn generate(
    slope: f64,
    noise_std: f64,
    pattern_id: f64,
    sample_count: usize,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    if noise_std <= 0.0 {
        return Err(ModelError::InvalidParameters(format!(
            "noise_std ({noise_std}) must be strictly positive"
        )));
    }

    let mut rng = StdRng::seed_from_u64(SEED);

    let mut x: Vec<f64> = (0..sample_count)
        .map(|_| rng.random_range(X_LOW..X_HIGH))
        .collect();
    x.sort_by(f64::total_cmp);

    // Guarded above: the standard deviation is finite and positive.
    let normal = Normal::new(0.0, noise_std)
        .map_err(|e| ModelError::InvalidParameters(format!("noise_std: {e}")))?;
    let noise: Vec<f64> = (0..sample_count).map(|_| normal.sample(&mut rng)).collect();

    let quadratic = pattern_id as i64 == 1;
    let y_true: Vec<f64> = x
        .iter()
        .map(|&xi| {
            let linear = slope * xi + TRUE_INTERCEPT;
            if quadratic { linear + 0.5 * xi * xi } else { linear }
        })
        .collect();
    let mut y_observed: Vec<f64> = y_true.iter().zip(&noise).map(|(t, n)| t + n).collect();

    if pattern_id as i64 == 2 {
        let n_outliers = (sample_count as f64 * OUTLIER_FRACTION) as usize;
        if n_outliers > 0 {
            let shift = 5.0 * noise_std + 5.0;
            for idx in index::sample(&mut rng, sample_count, n_outliers) {
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                y_observed[idx] += sign * shift;
            }
        }
    }

    Ok((x, y_true, y_observed))
}
