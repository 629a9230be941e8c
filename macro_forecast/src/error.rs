//! Error types for the macro_forecast crate

use outlook_math::MathError;
use thiserror::Error;

/// Custom error types for the macro_forecast crate
#[derive(Debug, Error)]
pub enum OutlookError {
    /// Upstream source unreachable or returned a non-success response
    #[error("Fetch error for indicator {indicator}: {message}")]
    Fetch {
        indicator: String,
        message: String,
        /// Whether trying again later may succeed (timeouts, 5xx)
        retryable: bool,
    },

    /// Every configured indicator failed or produced no rows
    #[error("No data: {0}")]
    NoData(String),

    /// Series too short for the requested model order
    #[error("Insufficient data: need at least {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// Model estimation did not converge
    #[error("Model fit did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Year keys are inconsistent across or within tables
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from numerical routines other than convergence
    #[error("Math error: {0}")]
    Math(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing CSV output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading or writing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutlookError {
    /// Build a fetch error for one indicator
    pub fn fetch(indicator: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        OutlookError::Fetch {
            indicator: indicator.into(),
            message: message.into(),
            retryable,
        }
    }

    /// Whether the failure is transient and the operation may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, OutlookError::Fetch { retryable: true, .. })
    }

    /// Whether the failure came from the forecaster rather than the data layer
    pub fn is_forecast_failure(&self) -> bool {
        matches!(
            self,
            OutlookError::InsufficientData { .. } | OutlookError::NonConvergence { .. }
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, OutlookError>;

impl From<MathError> for OutlookError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::NoConvergence { iterations } => OutlookError::NonConvergence { iterations },
            MathError::InvalidInput(msg) => OutlookError::InvalidParameter(msg),
            other => OutlookError::Math(other.to_string()),
        }
    }
}
