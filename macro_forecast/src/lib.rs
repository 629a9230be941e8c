//! # Macro Forecast
//!
//! Aligns annual macroeconomic indicator series (GDP, inflation,
//! unemployment) for one country by year and projects each series forward
//! with an ARIMA(2,1,2) model.
//!
//! ## Stages
//!
//! - **Build**: raw `(year, value?)` records become a cleaned, year-sorted
//!   [`IndicatorTable`]
//! - **Merge**: tables are outer-joined on year into a [`MergedTable`]
//! - **Forecast**: each merged column is fit after dropping unset cells
//! - **Assemble**: history and forecast become a [`CombinedSeries`] with
//!   every row tagged `actual` or `forecast`
//!
//! [`pipeline::Pipeline`] runs all four for a configured indicator set.
//!
//! ## Quick Start
//!
//! ```no_run
//! use macro_forecast::config::OutlookConfig;
//! use macro_forecast::pipeline::Pipeline;
//! use macro_forecast::source::SampleSource;
//!
//! let config = OutlookConfig::default().with_years(2010, 2024).with_horizon(6);
//! let report = Pipeline::new(config, &SampleSource)?.run()?;
//!
//! for outlook in &report.indicators {
//!     println!("{}: {} rows", outlook.name, outlook.series.len());
//! }
//! # Ok::<(), macro_forecast::OutlookError>(())
//! ```

pub mod assemble;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod source;

// Re-export commonly used types
pub use crate::assemble::{assemble, assemble_column, CombinedPoint, CombinedSeries, PointKind};
pub use crate::config::{IndicatorSpec, OutlookConfig};
pub use crate::data::{build, IndicatorTable, RawRecord, YearValue};
pub use crate::error::{OutlookError, Result};
pub use crate::merge::{merge, MergedRow, MergedTable};
pub use crate::models::{forecast, ForecastModel, ForecastResult, Forecaster, TrainedForecastModel};
pub use crate::pipeline::{OutlookReport, Pipeline};
pub use crate::source::DataSource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
