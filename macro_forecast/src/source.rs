//! Upstream providers of raw yearly records
//!
//! A source answers one indicator at a time. Failing for one indicator must
//! not affect the others; the pipeline decides what to do with the error.

use crate::data::RawRecord;
use crate::error::{OutlookError, Result};
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub mod sample;
pub mod world_bank;

pub use sample::SampleSource;
pub use world_bank::WorldBankSource;

/// Something that can return yearly records for an indicator code
pub trait DataSource {
    /// Records for `code` in `country` within `years`, in any order
    fn fetch(&self, code: &str, country: &str, years: RangeInclusive<i32>) -> Result<Vec<RawRecord>>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

/// In-memory source keyed by indicator code.
///
/// Country is ignored. Years outside the requested range are filtered out.
/// Unknown codes fail like a non-success upstream response.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<String, Vec<RawRecord>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, code: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.series.insert(code.into(), records);
        self
    }

    pub fn insert(&mut self, code: impl Into<String>, records: Vec<RawRecord>) {
        self.series.insert(code.into(), records);
    }
}

impl DataSource for StaticSource {
    fn fetch(&self, code: &str, _country: &str, years: RangeInclusive<i32>) -> Result<Vec<RawRecord>> {
        let records = self
            .series
            .get(code)
            .ok_or_else(|| OutlookError::fetch(code, "no series registered for this code", false))?;

        Ok(records
            .iter()
            .filter(|r| years.contains(&r.year))
            .copied()
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
