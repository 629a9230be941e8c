//! Forecasting models for yearly indicator series

use crate::error::{OutlookError, Result};
use std::fmt::Debug;
use tracing::debug;

pub mod arima;

use arima::ArimaModel;

/// Point forecasts for consecutive future periods, optionally with
/// prediction intervals
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values, offset 1 first
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Prediction intervals as (lower, upper), one per value
    intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(OutlookError::InvalidParameter(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
        })
    }

    /// Create a new forecast result with prediction intervals
    pub fn new_with_intervals(
        values: Vec<f64>,
        horizons: usize,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        let mut result = Self::new(values, horizons)?;

        if result.values.len() != intervals.len() {
            return Err(OutlookError::InvalidParameter(format!(
                "Values length ({}) doesn't match intervals length ({})",
                result.values.len(),
                intervals.len()
            )));
        }

        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Drop the first `count` periods.
    ///
    /// Used when a series stops before the shared last year: the leading
    /// steps cover years that already belong to the historical window.
    pub fn skip_leading(&self, count: usize) -> Self {
        let count = count.min(self.horizons);
        Self {
            values: self.values[count..].to_vec(),
            horizons: self.horizons - count,
            intervals: self.intervals.as_ref().map(|i| i[count..].to_vec()),
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate point forecasts for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Generate point forecasts with prediction intervals at `level` (0..1)
    fn forecast_with_intervals(&self, horizons: usize, level: f64) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a dense series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on consecutive observations
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Smallest series length the model accepts
    fn min_observations(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Drop unset cells, keeping the order of the remaining observations.
///
/// Gaps are closed by deletion; nothing is interpolated.
pub fn clean_column(column: &[Option<f64>]) -> Vec<f64> {
    column
        .iter()
        .filter_map(|cell| (*cell).filter(|v| v.is_finite()))
        .collect()
}

/// Fits one model per call to a column of the merged table.
///
/// Every indicator goes through the same instance, so order and settings
/// cannot drift between indicators.
#[derive(Debug, Clone)]
pub struct Forecaster<M: ForecastModel = ArimaModel> {
    model: M,
}

impl Forecaster<ArimaModel> {
    /// ARIMA(2,1,2) forecaster
    pub fn new() -> Self {
        Self {
            model: ArimaModel::new(2, 1, 2),
        }
    }
}

impl Default for Forecaster<ArimaModel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ForecastModel> Forecaster<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn train_column(&self, column: &[Option<f64>], horizon: usize) -> Result<M::Trained> {
        if horizon == 0 {
            return Err(OutlookError::InvalidParameter(
                "horizon must be a positive number of periods".to_string(),
            ));
        }

        let series = clean_column(column);
        let required = self.model.min_observations();
        if series.len() < required {
            return Err(OutlookError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        debug!(
            model = self.model.name(),
            observations = series.len(),
            dropped = column.len() - series.len(),
            "fitting column"
        );
        self.model.train(&series)
    }

    /// Point forecasts for `horizon` periods after the last set cell
    pub fn forecast(&self, column: &[Option<f64>], horizon: usize) -> Result<ForecastResult> {
        self.train_column(column, horizon)?.forecast(horizon)
    }

    /// Point forecasts plus prediction intervals
    pub fn forecast_with_intervals(
        &self,
        column: &[Option<f64>],
        horizon: usize,
        level: f64,
    ) -> Result<ForecastResult> {
        self.train_column(column, horizon)?
            .forecast_with_intervals(horizon, level)
    }
}

/// ARIMA(2,1,2) point forecasts for one column
pub fn forecast(column: &[Option<f64>], horizon: usize) -> Result<ForecastResult> {
    Forecaster::new().forecast(column, horizon)
}
