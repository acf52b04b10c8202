//! Boundary validation: request bodies deserialize into lenient schemas
//! (every field optional) and are then checked into typed commands, so a
//! missing field is reported with a fixed message naming what is required.

use crate::response::AppError;

pub const MISSING_PARAMETERS: &str = "MISSING_PARAMETERS";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";

pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, AppError>;
}

/// Trimmed, non-empty text.
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strictly positive, finite number.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

pub fn missing(message: &str) -> AppError {
    AppError::bad_request(MISSING_PARAMETERS, message)
}

pub fn invalid(message: &str) -> AppError {
    AppError::bad_request(INVALID_PARAMETER, message)
}
