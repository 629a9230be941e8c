//! Joining history and forecast into one labelled series

use crate::data::YearValue;
use crate::error::{OutlookError, Result};
use crate::models::ForecastResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a point was observed or projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Actual,
    Forecast,
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKind::Actual => write!(f, "actual"),
            PointKind::Forecast => write!(f, "forecast"),
        }
    }
}

/// One row of a combined series.
///
/// Forecast rows always carry a value. Actual rows taken from a merged
/// column carry `None` for years the indicator was not observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub year: i32,
    pub value: Option<f64>,
    pub kind: PointKind,
    /// Prediction interval, forecast rows only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<(f64, f64)>,
}

/// Historical rows followed by forecast rows, ascending by year
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedSeries {
    points: Vec<CombinedPoint>,
}

impl CombinedSeries {
    pub fn rows(&self) -> &[CombinedPoint] {
        &self.points
    }

    pub fn actual(&self) -> impl Iterator<Item = &CombinedPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Actual)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &CombinedPoint> {
        self.points.iter().filter(|p| p.kind == PointKind::Forecast)
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn actual_point(year: i32, value: Option<f64>) -> CombinedPoint {
    CombinedPoint {
        year,
        value,
        kind: PointKind::Actual,
        interval: None,
    }
}

fn check_ascending(years: impl Iterator<Item = i32>) -> Result<()> {
    let mut previous: Option<i32> = None;
    for year in years {
        if let Some(prev) = previous {
            if year <= prev {
                return Err(OutlookError::Alignment(format!(
                    "historical year {} does not follow {}",
                    year, prev
                )));
            }
        }
        previous = Some(year);
    }
    Ok(())
}

fn combine(
    historical: Vec<CombinedPoint>,
    forecast: &ForecastResult,
    last_historical_year: i32,
) -> Result<CombinedSeries> {
    check_ascending(historical.iter().map(|p| p.year))?;
    if let Some(late) = historical.iter().find(|p| p.year > last_historical_year) {
        return Err(OutlookError::Alignment(format!(
            "historical year {} is after the last historical year {}",
            late.year, last_historical_year
        )));
    }

    let mut points = historical;
    points.reserve(forecast.horizons());
    for (offset, value) in forecast.values().iter().enumerate() {
        points.push(CombinedPoint {
            year: last_historical_year + offset as i32 + 1,
            value: Some(*value),
            kind: PointKind::Forecast,
            interval: forecast.intervals().map(|i| i[offset]),
        });
    }

    Ok(CombinedSeries { points })
}

/// Tag `historical` as actual and append the forecast.
///
/// Forecast years run from `last_historical_year + 1` upward, one per
/// forecast value. Fails with an alignment error if the history is not
/// strictly ascending or reaches past `last_historical_year`.
pub fn assemble(
    historical: &[YearValue],
    forecast: &ForecastResult,
    last_historical_year: i32,
) -> Result<CombinedSeries> {
    let actual = historical
        .iter()
        .map(|r| actual_point(r.year, Some(r.value)))
        .collect();
    combine(actual, forecast, last_historical_year)
}

/// Like [`assemble`], but over a full merged column.
///
/// Every year of `years` becomes an actual row, so indicators with gaps keep
/// one row per merged year with `None` in place of the missing value.
pub fn assemble_column(
    years: &[i32],
    column: &[Option<f64>],
    forecast: &ForecastResult,
    last_historical_year: i32,
) -> Result<CombinedSeries> {
    if years.len() != column.len() {
        return Err(OutlookError::Alignment(format!(
            "{} years for {} column cells",
            years.len(),
            column.len()
        )));
    }

    let actual = years
        .iter()
        .zip(column.iter())
        .map(|(&year, &value)| actual_point(year, value))
        .collect();
    combine(actual, forecast, last_historical_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forecast_years_follow_last_year() {
        let historical = vec![YearValue::new(2022, 1.0), YearValue::new(2023, 2.0)];
        let forecast = ForecastResult::new(vec![3.0, 4.0], 2).unwrap();

        let combined = assemble(&historical, &forecast, 2023).unwrap();

        assert_eq!(combined.years(), vec![2022, 2023, 2024, 2025]);
        let kinds: Vec<PointKind> = combined.rows().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PointKind::Actual,
                PointKind::Actual,
                PointKind::Forecast,
                PointKind::Forecast
            ]
        );
    }

    #[test]
    fn test_history_past_last_year_rejected() {
        let historical = vec![YearValue::new(2024, 1.0)];
        let forecast = ForecastResult::new(vec![3.0], 1).unwrap();

        assert!(matches!(
            assemble(&historical, &forecast, 2023),
            Err(OutlookError::Alignment(_))
        ));
    }

    #[test]
    fn test_kind_serialises_lowercase() {
        let point = CombinedPoint {
            year: 2025,
            value: Some(1.5),
            kind: PointKind::Forecast,
            interval: None,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"year":2025,"value":1.5,"kind":"forecast"}"#
        );
    }
}
