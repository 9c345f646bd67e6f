//! Continuous uniform distribution on [a, b].

use std::collections::BTreeMap;

use crate::curve::CurveData;
use crate::descriptor::{Category, ModelDescriptor, ModelType, ParameterSchema};
use crate::error::{ModelError, Result};

use super::linspace;

/// Fraction of the interval width added on each side of the sampled range,
/// so the flat region and both edges stay visible in the plot.
const MARGIN_FRACTION: f64 = 0.2;

const DEFAULT_A: f64 = 0.0;
const DEFAULT_B: f64 = 1.0;

pub(crate) fn descriptor() -> Result<ModelDescriptor> {
    ModelDescriptor::new(
        ModelType::Uniform,
        "Uniform distribution",
        "Continuous distribution with equal density everywhere on the \
         interval [a, b]. Every value in the interval is equally likely.",
        Category::Continuous,
        &["basic", "continuous", "uniform", "equiprobable"],
        r"f(x) = \begin{cases} \frac{1}{b-a} & \text{if } a \leq x \leq b \\ 0 & \text{otherwise} \end{cases}",
        Some(
            r"F(x) = \begin{cases} 0 & \text{if } x < a \\ \frac{x-a}{b-a} & \text{if } a \leq x \leq b \\ 1 & \text{if } x > b \end{cases}",
        ),
        vec![
            ParameterSchema::new(
                "a",
                "Lower bound (a)",
                "Lower edge of the distribution's support.",
                DEFAULT_A,
                -10.0,
                10.0,
                0.1,
            )?,
            ParameterSchema::new(
                "b",
                "Upper bound (b)",
                "Upper edge of the distribution's support.",
                DEFAULT_B,
                -10.0,
                10.0,
                0.1,
            )?,
        ],
    )
}

pub(crate) fn compute(params: &BTreeMap<String, f64>, sample_count: usize) -> Result<CurveData> {
    let a = params.get("a").copied().unwrap_or(DEFAULT_A);
    let b = params.get("b").copied().unwrap_or(DEFAULT_B);
    calculate(a, b, sample_count)
}

/// Samples the uniform PDF/CDF over `[a - 0.2(b-a), b + 0.2(b-a)]` and
/// attaches the closed-form moments.
///
/// # Errors
/// Returns `ModelError::InvalidParameters` if `a >= b`.
pub fn calculate(a: f64, b: f64, sample_count: usize) -> Result<CurveData> {
    if a >= b {
        return Err(ModelError::InvalidParameters(format!(
            "lower bound a ({a}) must be below upper bound b ({b})"
        )));
    }

    let width = b - a;
    let margin = width * MARGIN_FRACTION;
    let x_values = linspace(a - margin, b + margin, sample_count);

    let density = 1.0 / width;
    let pdf_values = x_values
        .iter()
        .map(|&x| if (a..=b).contains(&x) { density } else { 0.0 })
        .collect();
    let cdf_values = x_values
        .iter()
        .map(|&x| ((x - a) / width).clamp(0.0, 1.0))
        .collect();

    let mean = (a + b) / 2.0;
    let variance = width * width / 12.0;

    CurveData::distribution(x_values, pdf_values, cdf_values, mean, variance, variance.sqrt())
}
