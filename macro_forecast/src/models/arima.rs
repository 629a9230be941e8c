//! ARIMA models for yearly series
//!
//! Estimation uses conditional sum of squares (CSS) on the differenced,
//! demeaned series. Coefficients are searched in an unconstrained space and
//! mapped through the partial autocorrelation transform, so every candidate
//! is stationary (AR) and invertible (MA). The sample mean of the
//! differenced series is kept as a drift term.

use crate::error::{OutlookError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use outlook_math::optimize::NelderMead;
use outlook_math::{arma, differencing, mean, stationarity};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Penalty on the squared unconstrained parameters; keeps the minimum finite
/// when the data push a coefficient towards the unit circle.
const RIDGE: f64 = 1e-6;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// Simplex settings used for estimation
    optimizer: NelderMead,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    d: usize,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series
    drift: f64,
    /// Residual variance of the CSS fit
    sigma2: f64,
    /// Differenced, demeaned training series
    centered: Vec<f64>,
    residuals: Vec<f64>,
    /// Last value at each differencing level, for integration
    tails: Vec<f64>,
    iterations: usize,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            optimizer: NelderMead {
                max_iterations: 5000,
                x_tolerance: 1e-5,
                f_tolerance: 1e-10,
                initial_step: 0.5,
            },
        }
    }

    /// Replace the optimiser settings
    pub fn with_optimizer(mut self, optimizer: NelderMead) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// (p, d, q)
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    fn split<'a>(&self, params: &'a [f64]) -> (&'a [f64], &'a [f64]) {
        params.split_at(self.p)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &[f64]) -> Result<TrainedArimaModel> {
        let required = self.min_observations();
        if series.len() < required {
            return Err(OutlookError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let differenced = differencing::difference(series, self.d);
        let drift = mean(&differenced).ok_or_else(|| OutlookError::InsufficientData {
            required,
            available: series.len(),
        })?;
        let centered: Vec<f64> = differenced.iter().map(|w| w - drift).collect();
        let scale: f64 = centered.iter().map(|z| z * z).sum();

        let objective = |params: &[f64]| {
            let (ar_raw, ma_raw) = self.split(params);
            let ar = stationarity::constrain_stationary(ar_raw);
            let ma = stationarity::constrain_invertible(ma_raw);
            let css = arma::conditional_sum_of_squares(&centered, &ar, &ma);
            let fit = if scale > 0.0 { css / scale } else { css };
            fit + RIDGE * params.iter().map(|x| x * x).sum::<f64>()
        };

        let start = vec![0.0; self.p + self.q];
        let minimum = self.optimizer.minimize(objective, &start)?;

        let (ar_raw, ma_raw) = self.split(&minimum.point);
        let ar_coefficients = stationarity::constrain_stationary(ar_raw);
        let ma_coefficients = stationarity::constrain_invertible(ma_raw);

        let residuals = arma::css_residuals(&centered, &ar_coefficients, &ma_coefficients);
        let effective = centered.len() - self.p;
        let sigma2 = residuals.iter().skip(self.p).map(|e| e * e).sum::<f64>() / effective as f64;
        let tails = differencing::difference_tails(series, self.d)?;

        debug!(
            model = %self.name,
            ar = ?ar_coefficients,
            ma = ?ma_coefficients,
            drift,
            sigma2,
            iterations = minimum.iterations,
            "ARIMA fit converged"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            d: self.d,
            ar_coefficients,
            ma_coefficients,
            drift,
            sigma2,
            centered,
            residuals,
            tails,
            iterations: minimum.iterations,
        })
    }

    /// One more observation than parameters plus differencing, so that the
    /// CSS fit always has at least one residual per free coefficient
    fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Simplex iterations used during estimation
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn point_path(&self, horizon: usize) -> Vec<f64> {
        let centered = arma::forecast(
            &self.centered,
            &self.residuals,
            &self.ar_coefficients,
            &self.ma_coefficients,
            horizon,
        );
        let differenced: Vec<f64> = centered.iter().map(|z| z + self.drift).collect();
        differencing::integrate(&differenced, &self.tails)
    }
}

fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(OutlookError::InvalidParameter(
            "horizon must be a positive number of periods".to_string(),
        ));
    }
    Ok(())
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        check_horizon(horizon)?;
        ForecastResult::new(self.point_path(horizon), horizon)
    }

    fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        check_horizon(horizon)?;
        if !(level > 0.0 && level < 1.0) {
            return Err(OutlookError::InvalidParameter(format!(
                "interval level must be between 0 and 1, got {}",
                level
            )));
        }

        let normal = Normal::new(0.0, 1.0).map_err(|e| OutlookError::Math(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + level / 2.0);

        let values = self.point_path(horizon);
        let psi = arma::psi_weights(&self.ar_coefficients, &self.ma_coefficients, self.d, horizon);

        let mut cumulative = 0.0;
        let intervals: Vec<(f64, f64)> = values
            .iter()
            .zip(psi.iter())
            .map(|(value, weight)| {
                cumulative += weight * weight;
                let margin = z * (self.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect();

        ForecastResult::new_with_intervals(values, horizon, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
