//! Parametric-curve computation engine for the visualization backend.
//!
//! Given a model type, a parameter map, and a sample count, the registry
//! produces a densely sampled curve plus summary statistics. Everything in
//! here is pure, synchronous, in-memory computation; the HTTP plumbing
//! lives in the `server` crate.

pub mod curve;
pub mod descriptor;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod regression;
pub mod units;
pub mod validator;

pub use curve::CurveData;
pub use descriptor::{Category, ModelDescriptor, ModelType, ParameterSchema};
pub use error::{ModelError, Result};
pub use registry::Registry;
pub use validator::validate_parameters;
