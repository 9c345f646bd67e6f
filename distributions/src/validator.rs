//! Cross-checks a caller-supplied parameter map against a model descriptor.

use std::collections::BTreeMap;

use crate::descriptor::ModelDescriptor;
use crate::error::{ModelError, Result};

/// Verifies that `parameters` matches the descriptor exactly: same key set,
/// every value finite and inside its schema bounds.
///
/// Pure check with no side effects. Fails on the first violated rule class
/// (key set, then ranges, then finiteness) but reports every offender
/// within that class.
///
/// # Errors
/// Returns `ModelError::Validation` naming the offending keys or values.
pub fn validate_parameters(
    descriptor: &ModelDescriptor,
    parameters: &BTreeMap<String, f64>,
) -> Result<()> {
    let missing: Vec<&str> = descriptor
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .filter(|name| !parameters.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ModelError::Validation(format!(
            "missing required parameters: {}",
            missing.join(", ")
        )));
    }

    let extra: Vec<&str> = parameters
        .keys()
        .map(String::as_str)
        .filter(|key| !descriptor.parameters.iter().any(|p| p.name == *key))
        .collect();
    if !extra.is_empty() {
        return Err(ModelError::Validation(format!(
            "unexpected parameters: {}",
            extra.join(", ")
        )));
    }

    let mut out_of_range = Vec::new();
    let mut non_finite = Vec::new();
    for schema in &descriptor.parameters {
        let value = parameters[&schema.name];
        if !value.is_finite() {
            non_finite.push(format!("{} ({value})", schema.name));
        } else if !(schema.min_value..=schema.max_value).contains(&value) {
            out_of_range.push(format!(
                "{} ({value}) outside [{}, {}]",
                schema.name, schema.min_value, schema.max_value
            ));
        }
    }
    if !out_of_range.is_empty() {
        return Err(ModelError::Validation(format!(
            "parameters out of range: {}",
            out_of_range.join("; ")
        )));
    }
    if !non_finite.is_empty() {
        return Err(ModelError::Validation(format!(
            "parameters must be finite numbers: {}",
            non_finite.join("; ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::descriptor::ModelType;
    use crate::registry::Registry;

    fn uniform_descriptor() -> ModelDescriptor {
        Registry::new()
            .unwrap()
            .describe(ModelType::Uniform)
            .unwrap()
            .clone()
    }

    fn params(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn accepts_exact_in_range_parameters() {
        let desc = uniform_descriptor();
        assert!(validate_parameters(&desc, &params(&[("a", -1.0), ("b", 4.0)])).is_ok());
    }

    #[test]
    fn reports_every_missing_key() {
        let desc = uniform_descriptor();
        let err = validate_parameters(&desc, &params(&[])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("a") && msg.contains("b"), "{msg}");
    }

    #[test]
    fn rejects_extra_keys() {
        let desc = uniform_descriptor();
        let err = validate_parameters(&desc, &params(&[("a", 0.0), ("b", 1.0), ("c", 2.0)]))
            .unwrap_err();
        assert!(err.to_string().contains("c"));
    }

    #[test]
    fn rejects_out_of_range_values_naming_bounds() {
        let desc = uniform_descriptor();
        let err =
            validate_parameters(&desc, &params(&[("a", -11.0), ("b", 1.0)])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("-11") && msg.contains("-10"), "{msg}");
    }

    #[test]
    fn rejects_non_finite_values() {
        let desc = uniform_descriptor();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err =
                validate_parameters(&desc, &params(&[("a", 0.0), ("b", bad)])).unwrap_err();
            assert!(matches!(err, ModelError::Validation(_)));
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let desc = uniform_descriptor();
        assert!(validate_parameters(&desc, &params(&[("a", -10.0), ("b", 10.0)])).is_ok());
    }
}
