use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::metrics::RegressionMetrics;
use crate::regression::Fit;

const MIN_POINTS: usize = 10;
const MAX_POINTS: usize = 10_000;

/// The output envelope of every computation: one x grid plus the derived
/// sequences a client needs to draw the curve, and summary statistics over
/// the dependent variable.
///
/// Distribution results carry `pdf_values`/`cdf_values`; regression results
/// carry `y_true`/`y_observed`/`y_fitted` and the fit-quality scalars.
/// Absent fields are omitted from the serialized form. Instances are created
/// fresh per request and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct CurveData {
    pub x_values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdf_values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_true: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_observed: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_fitted: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_estimated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept_estimated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl CurveData {
    /// Assembles a distribution-mode result, checking the envelope
    /// invariants.
    ///
    /// # Errors
    /// Returns `ModelError::Validation` if the sequences disagree in length,
    /// fall outside [10, 10000], or contain a non-finite value, or if the
    /// variance or standard deviation is negative.
    pub fn distribution(
        x_values: Vec<f64>,
        pdf_values: Vec<f64>,
        cdf_values: Vec<f64>,
        mean: f64,
        variance: f64,
        std_dev: f64,
    ) -> Result<Self> {
        check_lengths(&[
            ("x_values", &x_values),
            ("pdf_values", &pdf_values),
            ("cdf_values", &cdf_values),
        ])?;
        check_scalars(mean, variance, std_dev)?;

        Ok(Self {
            x_values,
            pdf_values: Some(pdf_values),
            cdf_values: Some(cdf_values),
            y_true: None,
            y_observed: None,
            y_fitted: None,
            r_squared: None,
            slope_estimated: None,
            intercept_estimated: None,
            rmse: None,
            mean,
            variance,
            std_dev,
        })
    }

    /// Assembles a regression-mode result, checking the envelope invariants.
    ///
    /// # Errors
    /// Same rules as [`CurveData::distribution`], applied to the regression
    /// sequences and the fit-quality scalars.
    pub fn regression(
        x_values: Vec<f64>,
        y_true: Vec<f64>,
        y_observed: Vec<f64>,
        y_fitted: Vec<f64>,
        fit: Fit,
        metrics: &RegressionMetrics,
        mean: f64,
        variance: f64,
        std_dev: f64,
    ) -> Result<Self> {
        check_lengths(&[
            ("x_values", &x_values),
            ("y_true", &y_true),
            ("y_observed", &y_observed),
            ("y_fitted", &y_fitted),
        ])?;
        check_scalars(mean, variance, std_dev)?;
        for (field, value) in [
            ("r_squared", metrics.r_squared),
            ("rmse", metrics.rmse),
            ("slope_estimated", fit.slope),
            ("intercept_estimated", fit.intercept),
        ] {
            if !value.is_finite() {
                return Err(ModelError::Validation(format!(
                    "{field} is not finite: {value}"
                )));
            }
        }

        Ok(Self {
            x_values,
            pdf_values: None,
            cdf_values: None,
            y_true: Some(y_true),
            y_observed: Some(y_observed),
            y_fitted: Some(y_fitted),
            r_squared: Some(metrics.r_squared),
            slope_estimated: Some(fit.slope),
            intercept_estimated: Some(fit.intercept),
            rmse: Some(metrics.rmse),
            mean,
            variance,
            std_dev,
        })
    }
}

fn check_lengths(sequences: &[(&str, &Vec<f64>)]) -> Result<()> {
    let (x_name, x) = sequences[0];
    if x.len() < MIN_POINTS || x.len() > MAX_POINTS {
        return Err(ModelError::Validation(format!(
            "{x_name} length {} outside [{MIN_POINTS}, {MAX_POINTS}]",
            x.len()
        )));
    }
    for &(name, seq) in sequences {
        if seq.len() != x.len() {
            return Err(ModelError::Validation(format!(
                "{name} length {} does not match {x_name} length {}",
                seq.len(),
                x.len()
            )));
        }
        if let Some(bad) = seq.iter().find(|v| !v.is_finite()) {
            return Err(ModelError::Validation(format!(
                "{name} contains a non-finite value: {bad}"
            )));
        }
    }
    Ok(())
}

fn check_scalars(mean: f64, variance: f64, std_dev: f64) -> Result<()> {
    for (field, value) in [("mean", mean), ("variance", variance), ("std_dev", std_dev)] {
        if !value.is_finite() {
            return Err(ModelError::Validation(format!(
                "{field} is not finite: {value}"
            )));
        }
    }
    if variance < 0.0 || std_dev < 0.0 {
        return Err(ModelError::Validation(format!(
            "variance ({variance}) and std_dev ({std_dev}) must be non-negative"
        )));
    }
    Ok(())
}
