//! Error types shared by every analysis routine.
//!
//! Routines never panic on malformed numeric input. Instead they return one of
//! the variants below so a renderer can show an empty-state message without
//! guarding every chart draw.

use thiserror::Error;

/// Errors returned by the analytics routines.
#[derive(Debug, Error)]
pub enum SpcError {
    /// Input is empty or shorter than the routine's minimum.
    #[error("insufficient data: need at least {required} values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Input is well-formed but describes a degenerate case
    /// (zero variance, zero-width control band, ...).
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: &'static str },

    /// Input contains NaN or an infinity.
    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SpcError {
    /// Returns `true` for the "insufficient data" sentinel.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, SpcError::InsufficientData { .. })
    }

    /// Returns `true` for degenerate-input results.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, SpcError::DegenerateInput { .. })
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SpcError>;

/// Checks that `data` holds at least `required` finite values.
pub(crate) fn require_finite(data: &[f64], required: usize) -> Result<()> {
    if data.len() < required {
        return Err(SpcError::InsufficientData {
            required,
            actual: data.len(),
        });
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(SpcError::NonFinite { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_finite_reports_length_first() {
        let err = require_finite(&[f64::NAN], 2).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn require_finite_reports_first_bad_index() {
        let err = require_finite(&[1.0, 2.0, f64::INFINITY, f64::NAN], 1).unwrap_err();
        assert!(matches!(err, SpcError::NonFinite { index: 2 }));
    }

    #[test]
    fn display_messages() {
        let err = SpcError::InsufficientData {
            required: 2,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 2 values, got 0"
        );
        let err = SpcError::DegenerateInput {
            reason: "zero-width control band",
        };
        assert!(err.is_degenerate());
        assert_eq!(err.to_string(), "degenerate input: zero-width control band");
    }
}
