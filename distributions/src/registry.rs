//! The static model registry: one descriptor plus one computation unit per
//! supported model, assembled once at startup and read-only afterwards.

use std::collections::BTreeMap;

use log::debug;

use crate::curve::CurveData;
use crate::descriptor::{ModelDescriptor, ModelType};
use crate::error::{ModelError, Result};
use crate::units::{exponential, linear_regression, uniform};

type ComputeFn = fn(&BTreeMap<String, f64>, usize) -> Result<CurveData>;

struct Entry {
    descriptor: ModelDescriptor,
    /// `None` marks a descriptor registered without a wired unit; compute
    /// then fails with `NotImplemented`.
    unit: Option<ComputeFn>,
}

/// Maps each model type to its `{describe, compute}` capability pair.
///
/// The registry holds no mutable state and is safe to share across any
/// number of concurrent readers.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Builds the registry with every supported model wired in, in stable
    /// registration order.
    ///
    /// # Errors
    /// Returns `ModelError::Validation` if any static descriptor violates
    /// its own invariants, which would be an assembly bug.
    pub fn new() -> Result<Self> {
        Ok(Self {
            entries: vec![
                Entry {
                    descriptor: uniform::descriptor()?,
                    unit: Some(uniform::compute),
                },
                Entry {
                    descriptor: exponential::descriptor()?,
                    unit: Some(exponential::compute),
                },
                Entry {
                    descriptor: linear_regression::descriptor()?,
                    unit: Some(linear_regression::compute),
                },
            ],
        })
    }

    /// Every registered descriptor, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Looks up the descriptor for `model_type`.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownModel` if the type is not registered.
    pub fn describe(&self, model_type: ModelType) -> Result<&ModelDescriptor> {
        self.entry(model_type).map(|e| &e.descriptor)
    }

    /// Runs the computation unit for `model_type` on the given parameters.
    ///
    /// Parameters absent from the map fall back to their schema defaults;
    /// callers that need strict checking validate the map against the
    /// descriptor first (see [`crate::validator::validate_parameters`]).
    ///
    /// # Errors
    /// `ModelError::UnknownModel` for unregistered types,
    /// `ModelError::NotImplemented` for a registered type without a wired
    /// unit, or whatever the unit itself rejects.
    pub fn compute(
        &self,
        model_type: ModelType,
        parameters: &BTreeMap<String, f64>,
        sample_count: usize,
    ) -> Result<CurveData> {
        let entry = self.entry(model_type)?;
        let unit = entry.unit.ok_or_else(|| ModelError::NotImplemented {
            model_type: model_type.to_string(),
        })?;

        debug!("computing {model_type} over {sample_count} points");
        unit(parameters, sample_count)
    }

    fn entry(&self, model_type: ModelType) -> Result<&Entry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.model_type == model_type)
            .ok_or_else(|| ModelError::UnknownModel {
                model_type: model_type.to_string(),
            })
    }

    #[cfg(test)]
    fn unwire(&mut self, model_type: ModelType) {
        for entry in &mut self.entries {
            if entry.descriptor.model_type == model_type {
                entry.unit = None;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lists_models_in_registration_order() {
        let registry = Registry::new().unwrap();
        let types: Vec<ModelType> = registry.list().map(|d| d.model_type).collect();
        assert_eq!(
            types,
            [
                ModelType::Uniform,
                ModelType::Exponential,
                ModelType::LinearRegression
            ]
        );
    }

    #[test]
    fn describe_returns_the_matching_descriptor() {
        let registry = Registry::new().unwrap();
        let desc = registry.describe(ModelType::Exponential).unwrap();
        assert_eq!(desc.model_type, ModelType::Exponential);
        assert_eq!(desc.parameters.len(), 1);
    }

    #[test]
    fn unwired_unit_reports_not_implemented() {
        let mut registry = Registry::new().unwrap();
        registry.unwire(ModelType::Uniform);

        let err = registry
            .compute(ModelType::Uniform, &BTreeMap::new(), 100)
            .unwrap_err();
        assert!(matches!(err, ModelError::NotImplemented { .. }));
        // describe still works for the same entry
        assert!(registry.describe(ModelType::Uniform).is_ok());
    }

    #[test]
    fn compute_falls_back_to_schema_defaults() {
        let registry = Registry::new().unwrap();
        let data = registry
            .compute(ModelType::Uniform, &BTreeMap::new(), 100)
            .unwrap();
        // defaults a = 0, b = 1
        assert!((data.mean - 0.5).abs() < 1e-12);
    }
}
