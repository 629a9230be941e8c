//! Pipeline configuration

use crate::error::{OutlookError, Result};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Default number of years to project
pub const DEFAULT_HORIZON: usize = 5;

/// One upstream indicator code and the column name it becomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub code: String,
    pub name: String,
}

impl IndicatorSpec {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// The built-in indicator set: GDP, inflation and unemployment
pub fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::new("NY.GDP.MKTP.CD", "GDP"),
        IndicatorSpec::new("FP.CPI.TOTL.ZG", "Inflation"),
        IndicatorSpec::new("SL.UEM.TOTL.ZS", "Unemployment"),
    ]
}

/// Everything a pipeline run needs.
///
/// Passed by value into [`crate::pipeline::Pipeline`]; nothing is read from
/// global state, so runs with different configs are independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlookConfig {
    /// Country code understood by the data source (ISO 3166 alpha-3)
    pub country: String,
    /// First year requested from the source
    pub start_year: i32,
    /// Last year requested from the source
    pub end_year: i32,
    /// Years to project after the last observed year
    pub horizon: usize,
    /// Ordered mapping from source code to indicator name
    pub indicators: Vec<IndicatorSpec>,
    /// HTTP timeout for one indicator request, in seconds
    pub request_timeout_secs: u64,
    /// When set, forecasts carry prediction intervals at this level
    pub interval_level: Option<f64>,
}

impl Default for OutlookConfig {
    fn default() -> Self {
        Self {
            country: "UZB".to_string(),
            start_year: 2010,
            end_year: Utc::now().year() - 1,
            horizon: DEFAULT_HORIZON,
            indicators: default_indicators(),
            request_timeout_secs: 30,
            interval_level: None,
        }
    }
}

impl OutlookConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    pub fn with_indicators(mut self, indicators: Vec<IndicatorSpec>) -> Self {
        self.indicators = indicators;
        self
    }

    /// Check the invariants a run depends on
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(OutlookError::InvalidParameter(
                "horizon must be a positive integer".to_string(),
            ));
        }
        if self.start_year > self.end_year {
            return Err(OutlookError::InvalidParameter(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.indicators.is_empty() {
            return Err(OutlookError::InvalidParameter(
                "at least one indicator must be configured".to_string(),
            ));
        }
        if self.country.trim().is_empty() {
            return Err(OutlookError::InvalidParameter(
                "country must not be empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut codes = HashSet::new();
        for spec in &self.indicators {
            if !names.insert(spec.name.as_str()) {
                return Err(OutlookError::InvalidParameter(format!(
                    "indicator name '{}' is used twice",
                    spec.name
                )));
            }
            if !codes.insert(spec.code.as_str()) {
                return Err(OutlookError::InvalidParameter(format!(
                    "indicator code '{}' is used twice",
                    spec.code
                )));
            }
        }

        if let Some(level) = self.interval_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(OutlookError::InvalidParameter(format!(
                    "interval level must be between 0 and 1, got {}",
                    level
                )));
            }
        }

        Ok(())
    }
}
