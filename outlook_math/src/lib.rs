//! # Outlook Math
//!
//! Numerical building blocks used to estimate and forecast ARIMA models.
//! The routines work on plain `f64` slices and know nothing about years,
//! indicators or tables.

use thiserror::Error;

pub mod arma;
pub mod differencing;
pub mod optimize;
pub mod stationarity;

/// Errors that can occur in the numerical routines
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Optimizer did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_error_display() {
        let err = MathError::NoConvergence { iterations: 42 };
        assert_eq!(
            err.to_string(),
            "Optimizer did not converge after 42 iterations"
        );
    }
}
