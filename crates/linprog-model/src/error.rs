use thiserror::Error;

/// Errors raised while building a [`Model`](crate::Model).
///
/// Every error is reported by the call that caused it; the model is left
/// exactly as it was before that call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Invalid bounds for {variable}: [{lower}, {upper}]")]
    InvalidBounds { variable: String, lower: f64, upper: f64 },
    #[error("Non-finite coefficient for {term}: {value}")]
    NonFiniteCoefficient { term: String, value: f64 },
}
