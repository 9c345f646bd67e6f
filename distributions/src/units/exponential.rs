//! Exponential distribution with rate parameter λ.

use std::collections::BTreeMap;

use crate::curve::CurveData;
use crate::descriptor::{Category, ModelDescriptor, ModelType, ParameterSchema};
use crate::error::{ModelError, Result};

use super::linspace;

/// The sampled range ends at mean + TAIL_STD_DEVS * std_dev, i.e. x = 7/λ,
/// where the CDF reaches 1 - e⁻⁷ ≈ 0.99909 of the mass.
const TAIL_STD_DEVS: f64 = 6.0;

const DEFAULT_RATE: f64 = 1.0;

pub(crate) fn descriptor() -> Result<ModelDescriptor> {
    ModelDescriptor::new(
        ModelType::Exponential,
        "Exponential distribution",
        "Continuous distribution of waiting times between events occurring \
         at a constant rate λ. Memoryless: the remaining wait never depends \
         on how long you have already waited.",
        Category::Continuous,
        &["basic", "continuous", "waiting time", "memoryless"],
        r"f(x) = \lambda e^{-\lambda x} \quad (x \geq 0)",
        Some(r"F(x) = 1 - e^{-\lambda x} \quad (x \geq 0)"),
        vec![ParameterSchema::new(
            "lambda_",
            "Rate (λ)",
            "Average number of events per unit of time. The mean waiting \
             time is 1/λ.",
            DEFAULT_RATE,
            0.1,
            10.0,
            0.1,
        )?],
    )
}

pub(crate) fn compute(params: &BTreeMap<String, f64>, sample_count: usize) -> Result<CurveData> {
    let rate = params.get("lambda_").copied().unwrap_or(DEFAULT_RATE);
    calculate(rate, sample_count)
}

/// Samples the exponential PDF/CDF from 0 to the right tail bound and
/// attaches the closed-form moments.
///
/// # Errors
/// Returns `ModelError::InvalidParameters` if `rate <= 0`.
pub fn calculate(rate: f64, sample_count: usize) -> Result<CurveData> {
    if rate <= 0.0 {
        return Err(ModelError::InvalidParameters(format!(
            "rate λ ({rate}) must be strictly positive"
        )));
    }

    let mean = 1.0 / rate;
    let std_dev = 1.0 / rate;
    let upper = mean + TAIL_STD_DEVS * std_dev;

    let x_values = linspace(0.0, upper, sample_count);
    let pdf_values = x_values.iter().map(|&x| rate * (-rate * x).exp()).collect();
    let cdf_values = x_values
        .iter()
        .map(|&x| 1.0 - (-rate * x).exp())
        .collect();

    let variance = 1.0 / (rate * rate);

    CurveData::distribution(x_values, pdf_values, cdf_values, mean, variance, std_dev)
}
