//! Raw indicator records and the cleaned per-indicator table

use serde::{Deserialize, Serialize};

/// One yearly observation as delivered by a data source.
///
/// `value` is `None` when the source reported the year without a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub year: i32,
    pub value: Option<f64>,
}

impl RawRecord {
    pub fn new(year: i32, value: Option<f64>) -> Self {
        Self { year, value }
    }
}

/// A year with an observed value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

impl YearValue {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Cleaned observations of a single indicator.
///
/// Rows are sorted ascending by year and every row carries a finite value.
/// Duplicate years are not collapsed here; they keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorTable {
    rows: Vec<YearValue>,
}

impl IndicatorTable {
    /// Build a table from raw records.
    ///
    /// Records without a value (or with a non-finite one) are dropped and the
    /// rest are stable-sorted by year. Empty input gives an empty table.
    pub fn build(records: &[RawRecord]) -> Self {
        let mut rows: Vec<YearValue> = records
            .iter()
            .filter_map(|r| match r.value {
                Some(v) if v.is_finite() => Some(YearValue::new(r.year, v)),
                _ => None,
            })
            .collect();
        rows.sort_by_key(|row| row.year);

        Self { rows }
    }

    /// Wrap rows as-is, without cleaning or sorting.
    ///
    /// The merger re-checks ordering, so a table built this way that breaks
    /// the ordering invariant is rejected there.
    pub fn from_rows(rows: Vec<YearValue>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[YearValue] {
        &self.rows
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Year of the final observation
    pub fn last_year(&self) -> Option<i32> {
        self.rows.last().map(|r| r.year)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Free-function form of [`IndicatorTable::build`]
pub fn build(records: &[RawRecord]) -> IndicatorTable {
    IndicatorTable::build(records)
}
