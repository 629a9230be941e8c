//! One end-to-end run: fetch, clean, merge, forecast and label each indicator

use crate::assemble::{assemble_column, CombinedSeries};
use crate::config::OutlookConfig;
use crate::data::IndicatorTable;
use crate::error::{OutlookError, Result};
use crate::merge::{merge, MergedTable};
use crate::models::{ForecastResult, Forecaster};
use crate::source::DataSource;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

/// Forecast outcome for one indicator
#[derive(Debug, Serialize)]
pub struct IndicatorOutlook {
    pub name: String,
    pub code: String,
    /// Actual rows for every merged year, then forecast rows if the fit worked
    pub series: CombinedSeries,
    /// Why there are no forecast rows, when there are none
    #[serde(serialize_with = "optional_message")]
    pub forecast_error: Option<OutlookError>,
}

impl IndicatorOutlook {
    pub fn has_forecast(&self) -> bool {
        self.forecast_error.is_none()
    }
}

/// An indicator left out of the merge because its fetch failed
#[derive(Debug, Serialize)]
pub struct FetchFailure {
    pub name: String,
    pub code: String,
    #[serde(serialize_with = "message")]
    pub error: OutlookError,
}

/// Everything handed to the presentation layer
#[derive(Debug, Serialize)]
pub struct OutlookReport {
    pub country: String,
    pub horizon: usize,
    /// Last year of the merged table; forecasts start the year after
    pub last_historical_year: i32,
    pub merged: MergedTable,
    pub indicators: Vec<IndicatorOutlook>,
    pub fetch_failures: Vec<FetchFailure>,
}

impl OutlookReport {
    pub fn indicator(&self, name: &str) -> Option<&IndicatorOutlook> {
        self.indicators.iter().find(|o| o.name == name)
    }
}

fn message<S: Serializer>(err: &OutlookError, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

fn optional_message<S: Serializer>(
    err: &Option<OutlookError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match err {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Runs the indicator set of one config against one data source
pub struct Pipeline<'a> {
    config: OutlookConfig,
    source: &'a dyn DataSource,
    forecaster: Forecaster,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: OutlookConfig, source: &'a dyn DataSource) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            forecaster: Forecaster::new(),
        })
    }

    pub fn config(&self) -> &OutlookConfig {
        &self.config
    }

    /// Execute the run.
    ///
    /// A failed fetch drops that indicator and the run goes on; only when no
    /// indicator delivers data does the run fail with [`OutlookError::NoData`].
    /// A failed forecast leaves the indicator with actual rows only.
    pub fn run(&self) -> Result<OutlookReport> {
        let config = &self.config;
        info!(
            country = %config.country,
            source = self.source.name(),
            indicators = config.indicators.len(),
            horizon = config.horizon,
            "starting outlook run"
        );

        let mut tables: Vec<(String, IndicatorTable)> = Vec::new();
        let mut codes: Vec<String> = Vec::new();
        let mut fetch_failures = Vec::new();

        for spec in &config.indicators {
            match self
                .source
                .fetch(&spec.code, &config.country, config.start_year..=config.end_year)
            {
                Ok(records) => {
                    let table = IndicatorTable::build(&records);
                    debug!(
                        indicator = %spec.name,
                        raw = records.len(),
                        kept = table.len(),
                        "built indicator table"
                    );
                    tables.push((spec.name.clone(), table));
                    codes.push(spec.code.clone());
                }
                Err(error) => {
                    warn!(
                        indicator = %spec.name,
                        code = %spec.code,
                        retryable = error.is_retryable(),
                        %error,
                        "fetch failed, excluding indicator"
                    );
                    fetch_failures.push(FetchFailure {
                        name: spec.name.clone(),
                        code: spec.code.clone(),
                        error,
                    });
                }
            }
        }

        if tables.is_empty() {
            return Err(OutlookError::NoData(format!(
                "all {} indicators failed to fetch",
                config.indicators.len()
            )));
        }

        let merged = merge(&tables)?;
        let last_year = merged.last_year().ok_or_else(|| {
            OutlookError::NoData("no indicator returned any observation".to_string())
        })?;
        let years = merged.years();

        let mut indicators = Vec::with_capacity(tables.len());
        for ((name, table), code) in tables.iter().zip(codes) {
            let column = merged.column(name).ok_or_else(|| {
                OutlookError::Alignment(format!("indicator '{}' missing from merged table", name))
            })?;
            let (series, forecast_error) =
                self.project(name, table, &years, &column, last_year)?;
            indicators.push(IndicatorOutlook {
                name: name.clone(),
                code,
                series,
                forecast_error,
            });
        }

        info!(
            years = merged.len(),
            forecasts = indicators.iter().filter(|o| o.has_forecast()).count(),
            failed_fetches = fetch_failures.len(),
            "outlook run finished"
        );

        Ok(OutlookReport {
            country: config.country.clone(),
            horizon: config.horizon,
            last_historical_year: last_year,
            merged,
            indicators,
            fetch_failures,
        })
    }

    fn project(
        &self,
        name: &str,
        table: &IndicatorTable,
        years: &[i32],
        column: &[Option<f64>],
        last_year: i32,
    ) -> Result<(CombinedSeries, Option<OutlookError>)> {
        // series that stop early are forecast through the shared last year
        let lag = table
            .last_year()
            .map(|y| (last_year - y).max(0) as usize)
            .unwrap_or(0);
        let steps = self.config.horizon + lag;

        let fitted = match self.config.interval_level {
            Some(level) => self.forecaster.forecast_with_intervals(column, steps, level),
            None => self.forecaster.forecast(column, steps),
        };

        match fitted {
            Ok(forecast) => {
                let forecast = forecast.skip_leading(lag);
                let series = assemble_column(years, column, &forecast, last_year)?;
                Ok((series, None))
            }
            Err(error) if error.is_forecast_failure() => {
                warn!(indicator = %name, %error, "forecast failed, keeping history only");
                let empty = ForecastResult::new(Vec::new(), 0)?;
                let series = assemble_column(years, column, &empty, last_year)?;
                Ok((series, Some(error)))
            }
            Err(error) => Err(error),
        }
    }
}

/// Convenience wrapper: build a [`Pipeline`] and run it once
pub fn run(config: OutlookConfig, source: &dyn DataSource) -> Result<OutlookReport> {
    Pipeline::new(config, source)?.run()
}
