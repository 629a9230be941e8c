//! Full outer alignment of indicator tables on the year key

use crate::data::{IndicatorTable, YearValue};
use crate::error::{OutlookError, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// One year of the merged table; `values` lines up with the table's indicators
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// Wide table keyed by year with one optional column per indicator.
///
/// Years are unique and ascending. A `None` cell means the indicator had no
/// observation for that year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTable {
    indicators: Vec<String>,
    rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Indicator names in column order
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.rows.last().map(|r| r.year)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn index_of(&self, indicator: &str) -> Option<usize> {
        self.indicators.iter().position(|name| name == indicator)
    }

    /// Cell for one indicator and year; `None` when either is unknown or unset
    pub fn value(&self, indicator: &str, year: i32) -> Option<f64> {
        let idx = self.index_of(indicator)?;
        let row = self.rows.iter().find(|r| r.year == year)?;
        row.values[idx]
    }

    /// Full column, one cell per merged year
    pub fn column(&self, indicator: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.index_of(indicator)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Only the years where the indicator is set
    pub fn observations(&self, indicator: &str) -> Option<Vec<YearValue>> {
        let idx = self.index_of(indicator)?;
        Some(
            self.rows
                .iter()
                .filter_map(|r| r.values[idx].map(|v| YearValue::new(r.year, v)))
                .collect(),
        )
    }
}

/// Outer-join indicator tables on year.
///
/// Every year present in any table appears once in the result. Cells for
/// indicators without that year stay `None`. If a table lists a year twice,
/// the later row wins.
pub fn merge(tables: &[(String, IndicatorTable)]) -> Result<MergedTable> {
    let mut seen = HashSet::new();
    for (name, _) in tables {
        if !seen.insert(name.as_str()) {
            return Err(OutlookError::Alignment(format!(
                "indicator '{}' supplied more than once",
                name
            )));
        }
    }

    let width = tables.len();
    let mut by_year: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();

    for (idx, (name, table)) in tables.iter().enumerate() {
        if let Some(pair) = table.rows().windows(2).find(|w| w[0].year > w[1].year) {
            return Err(OutlookError::Alignment(format!(
                "indicator '{}' has year {} after year {}",
                name, pair[1].year, pair[0].year
            )));
        }

        for row in table.rows() {
            let cells = by_year.entry(row.year).or_insert_with(|| vec![None; width]);
            if cells[idx].is_some() {
                warn!(indicator = %name, year = row.year, "duplicate year, keeping last value");
            }
            cells[idx] = Some(row.value);
        }
    }

    let rows: Vec<MergedRow> = by_year
        .into_iter()
        .map(|(year, values)| MergedRow { year, values })
        .collect();
    debug!(indicators = width, years = rows.len(), "merged indicator tables");

    Ok(MergedTable {
        indicators: tables.iter().map(|(name, _)| name.clone()).collect(),
        rows,
    })
}

struct RowView<'a> {
    indicators: &'a [String],
    row: &'a MergedRow,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.indicators.len() + 1))?;
        map.serialize_entry("year", &self.row.year)?;
        for (name, value) in self.indicators.iter().zip(self.row.values.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Serialises as a list of `{"year": .., "<indicator>": value|null, ..}` objects
impl Serialize for MergedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowView {
                indicators: &self.indicators,
                row,
            })?;
        }
        seq.end()
    }
}
