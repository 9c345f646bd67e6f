use std::fmt;

/// The result type used across the whole crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// All errors produced by the model registry and its computation units.
#[derive(Debug)]
pub enum ModelError {
    /// The requested model type is not present in the registry.
    UnknownModel { model_type: String },
    /// The caller-supplied input does not satisfy the model's schema.
    Validation(String),
    /// Parameters passed schema validation but form an illegal combination.
    InvalidParameters(String),
    /// A registered model has no computation unit wired in.
    NotImplemented { model_type: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel { model_type } => {
                write!(f, "unknown model type: {model_type}")
            }
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
            Self::NotImplemented { model_type } => {
                write!(f, "model {model_type} has no computation unit")
            }
        }
    }
}

impl std::error::Error for ModelError {}
