use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// The closed set of models the registry can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    Uniform,
    Exponential,
    LinearRegression,
}

impl ModelType {
    /// Returns the wire identifier of this model type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Exponential => "exponential",
            Self::LinearRegression => "linear_regression",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "exponential" => Ok(Self::Exponential),
            "linear_regression" => Ok(Self::LinearRegression),
            other => Err(ModelError::UnknownModel {
                model_type: other.to_string(),
            }),
        }
    }
}

/// Broad grouping used by the front end to organize models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Continuous,
    Discrete,
    Multivariate,
    MlRegression,
    MlClassification,
    MlClustering,
}

const NAME_MAX_LEN: usize = 50;
const TAG_MAX_LEN: usize = 30;
const MAX_PARAMETERS: usize = 20;

/// One named, bounded, steppable numeric input of a model.
///
/// Instances are built once at registry construction and never mutated.
/// The `step` field is advisory slider granularity and is not enforced on
/// submitted values.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSchema {
    pub name: String,
    pub label: String,
    pub description: String,
    pub default_value: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
}

impl ParameterSchema {
    /// Builds a parameter schema, checking its internal invariants.
    ///
    /// # Errors
    /// Returns `ModelError::Validation` if the name is not a valid
    /// identifier, if `min_value >= max_value`, if the default falls outside
    /// the bounds, or if `step` is not strictly positive.
    pub fn new(
        name: &str,
        label: &str,
        description: &str,
        default_value: f64,
        min_value: f64,
        max_value: f64,
        step: f64,
    ) -> Result<Self> {
        if !is_identifier(name) {
            return Err(ModelError::Validation(format!(
                "parameter name {name:?} is not a valid identifier"
            )));
        }
        if min_value >= max_value {
            return Err(ModelError::Validation(format!(
                "parameter {name}: min_value ({min_value}) must be below max_value ({max_value})"
            )));
        }
        if !(min_value..=max_value).contains(&default_value) {
            return Err(ModelError::Validation(format!(
                "parameter {name}: default_value ({default_value}) outside \
                 [{min_value}, {max_value}]"
            )));
        }
        if !(step > 0.0) {
            return Err(ModelError::Validation(format!(
                "parameter {name}: step ({step}) must be strictly positive"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            default_value,
            min_value,
            max_value,
            step,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > NAME_MAX_LEN {
        return false;
    }
    let mut chars = name.chars();
    let first = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    first && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Static metadata describing one registered model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDescriptor {
    #[serde(rename = "type")]
    pub model_type: ModelType,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Display-only LaTeX, never evaluated.
    pub formula_pdf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_cdf: Option<String>,
    pub parameters: Vec<ParameterSchema>,
}

impl ModelDescriptor {
    /// Builds a descriptor, deduplicating tags (first occurrence wins) and
    /// checking tag lengths, the parameter count, and name uniqueness.
    ///
    /// # Errors
    /// Returns `ModelError::Validation` on any violated invariant.
    pub fn new(
        model_type: ModelType,
        name: &str,
        description: &str,
        category: Category,
        tags: &[&str],
        formula_pdf: &str,
        formula_cdf: Option<&str>,
        parameters: Vec<ParameterSchema>,
    ) -> Result<Self> {
        let mut unique_tags: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if tag.is_empty() || tag.len() > TAG_MAX_LEN {
                return Err(ModelError::Validation(format!(
                    "tag {tag:?} must be 1 to {TAG_MAX_LEN} characters"
                )));
            }
            if !unique_tags.iter().any(|t| t == tag) {
                unique_tags.push(tag.to_string());
            }
        }

        if parameters.is_empty() || parameters.len() > MAX_PARAMETERS {
            return Err(ModelError::Validation(format!(
                "descriptor {model_type} must declare 1 to {MAX_PARAMETERS} parameters, \
                 got {}",
                parameters.len()
            )));
        }
        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(ModelError::Validation(format!(
                    "descriptor {model_type}: duplicate parameter name {:?}",
                    param.name
                )));
            }
        }

        Ok(Self {
            model_type,
            name: name.to_string(),
            description: description.to_string(),
            category,
            tags: unique_tags,
            formula_pdf: formula_pdf.to_string(),
            formula_cdf: formula_cdf.map(str::to_string),
            parameters,
        })
    }
}
