//! Error types shared by the transform engine and shape operations.

use thiserror::Error;

/// Geometry errors.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Zero determinant or zero projective denominator.
    #[error("Degenerate transform: {reason}")]
    DegenerateTransform { reason: String },
    /// A scale factor, offset or angle that is not a finite number.
    #[error("Invalid numeric input for {what}: {value}")]
    InvalidNumericInput { what: &'static str, value: f64 },
    /// A point-list operation that needs more points than are available.
    #[error("Insufficient points: need at least {required}, have {actual}")]
    InsufficientPoints { required: usize, actual: usize },
    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl GeometryError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateTransform {
            reason: reason.into(),
        }
    }

    /// Check if this error reports a degenerate transform.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateTransform { .. })
    }
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Reject non-finite values before they reach shape state.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> GeometryResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::InvalidNumericInput { what, value })
    }
}
