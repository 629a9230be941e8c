use macro_forecast::assemble::PointKind;
use macro_forecast::config::{IndicatorSpec, OutlookConfig};
use macro_forecast::data::RawRecord;
use macro_forecast::error::OutlookError;
use macro_forecast::pipeline::{run, Pipeline};
use macro_forecast::source::{SampleSource, StaticSource};
use pretty_assertions::assert_eq;

const GDP: &str = "NY.GDP.MKTP.CD";
const INFLATION: &str = "FP.CPI.TOTL.ZG";
const UNEMPLOYMENT: &str = "SL.UEM.TOTL.ZS";

fn yearly(values: &[f64]) -> Vec<RawRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| RawRecord::new(2010 + i as i32, Some(v)))
        .collect()
}

fn scenario_source() -> StaticSource {
    let gdp = yearly(&[
        34.2, 37.5, 41.0, 45.2, 50.1, 55.5, 61.3, 67.8, 74.0, 80.5, 88.0, 96.5, 106.0, 116.7, 128.2,
    ]);
    let mut inflation = yearly(&[
        7.8, 8.1, 8.5, 8.9, 9.2, 9.7, 10.2, 11.0, 11.8, 12.5, 13.3, 14.0, 14.8, 15.5, 16.2,
    ]);
    // 2015 reported without a value
    inflation[5].value = None;
    let unemployment = yearly(&[
        9.5, 9.3, 9.0, 8.8, 8.6, 8.4, 8.2, 8.0, 7.8, 7.5, 7.3, 7.1, 6.9, 6.7, 6.5,
    ]);

    StaticSource::new()
        .with_series(GDP, gdp)
        .with_series(INFLATION, inflation)
        .with_series(UNEMPLOYMENT, unemployment)
}

fn scenario_config() -> OutlookConfig {
    OutlookConfig::default().with_years(2010, 2024).with_horizon(6)
}

#[test]
fn test_end_to_end_scenario() {
    let source = scenario_source();
    let report = run(scenario_config(), &source).unwrap();

    assert_eq!(report.merged.len(), 15);
    assert_eq!(report.merged.value("Inflation", 2015), None);
    assert_eq!(report.merged.value("GDP", 2015), Some(55.5));
    assert_eq!(report.last_historical_year, 2024);
    assert!(report.fetch_failures.is_empty());

    for name in ["GDP", "Inflation", "Unemployment"] {
        let outlook = report.indicator(name).unwrap();
        assert!(outlook.has_forecast(), "{} has no forecast", name);

        let series = &outlook.series;
        assert_eq!(series.len(), 21, "{}", name);
        assert_eq!(series.actual().count(), 15);

        let forecast_years: Vec<i32> = series.forecast().map(|p| p.year).collect();
        assert_eq!(forecast_years, (2025..=2030).collect::<Vec<_>>());
        assert!(series
            .forecast()
            .all(|p| p.kind == PointKind::Forecast && p.value.is_some()));
    }

    let inflation = report.indicator("Inflation").unwrap();
    let gap = inflation.series.rows().iter().find(|p| p.year == 2015).unwrap();
    assert_eq!(gap.kind, PointKind::Actual);
    assert_eq!(gap.value, None);
}

#[test]
fn test_failed_fetch_excludes_indicator() {
    let source = StaticSource::new()
        .with_series(GDP, yearly(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]))
        .with_series(UNEMPLOYMENT, yearly(&[9.0, 8.5, 8.0, 7.5, 7.0, 6.5, 6.0, 5.5]));

    let report = run(scenario_config(), &source).unwrap();

    assert_eq!(report.merged.indicators(), &["GDP".to_string(), "Unemployment".to_string()]);
    assert_eq!(report.indicators.len(), 2);
    assert_eq!(report.fetch_failures.len(), 1);
    assert_eq!(report.fetch_failures[0].name, "Inflation");
    assert!(matches!(report.fetch_failures[0].error, OutlookError::Fetch { .. }));
}

#[test]
fn test_all_fetches_failing_is_no_data() {
    let result = run(scenario_config(), &StaticSource::new());
    assert!(matches!(result, Err(OutlookError::NoData(_))));
}

#[test]
fn test_only_null_values_is_no_data() {
    let source = StaticSource::new().with_series(GDP, vec![RawRecord::new(2010, None)]);
    let config = scenario_config().with_indicators(vec![IndicatorSpec::new(GDP, "GDP")]);

    assert!(matches!(run(config, &source), Err(OutlookError::NoData(_))));
}

#[test]
fn test_short_series_keeps_history_without_forecast() {
    let source = StaticSource::new()
        .with_series(GDP, yearly(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]))
        .with_series(INFLATION, yearly(&[5.0, 6.0, 7.0]));
    let config = scenario_config().with_indicators(vec![
        IndicatorSpec::new(GDP, "GDP"),
        IndicatorSpec::new(INFLATION, "Inflation"),
    ]);

    let report = run(config, &source).unwrap();

    let gdp = report.indicator("GDP").unwrap();
    assert!(gdp.has_forecast());
    assert_eq!(gdp.series.forecast().count(), 6);

    let inflation = report.indicator("Inflation").unwrap();
    assert!(matches!(
        inflation.forecast_error,
        Some(OutlookError::InsufficientData { available: 3, .. })
    ));
    assert_eq!(inflation.series.forecast().count(), 0);
    assert_eq!(inflation.series.len(), 10);
}

#[test]
fn test_series_ending_early_shares_forecast_years() {
    let gdp: Vec<f64> = (0..15).map(|i| 100.0 + 5.0 * i as f64).collect();
    let unemployment: Vec<f64> = (0..13).map(|i| 10.0 - 0.25 * i as f64).collect();
    let source = StaticSource::new()
        .with_series(GDP, yearly(&gdp))
        .with_series(UNEMPLOYMENT, yearly(&unemployment));
    let config = scenario_config().with_horizon(3).with_indicators(vec![
        IndicatorSpec::new(GDP, "GDP"),
        IndicatorSpec::new(UNEMPLOYMENT, "Unemployment"),
    ]);

    let report = run(config, &source).unwrap();
    let series = &report.indicator("Unemployment").unwrap().series;

    let forecast: Vec<(i32, f64)> = series
        .forecast()
        .map(|p| (p.year, p.value.unwrap()))
        .collect();
    // last observation 2022 at 7.0; 2023 and 2024 are skipped steps
    assert_eq!(forecast.iter().map(|(y, _)| *y).collect::<Vec<_>>(), vec![2025, 2026, 2027]);
    assert!((forecast[0].1 - 6.25).abs() < 1e-6);

    let unset: Vec<i32> = series
        .actual()
        .filter(|p| p.value.is_none())
        .map(|p| p.year)
        .collect();
    assert_eq!(unset, vec![2023, 2024]);
}

#[test]
fn test_sample_source_with_intervals() {
    let mut config = OutlookConfig::default().with_years(2010, 2024);
    config.interval_level = Some(0.8);

    let report = Pipeline::new(config, &SampleSource).unwrap().run().unwrap();

    for outlook in &report.indicators {
        assert!(outlook.has_forecast(), "{}", outlook.name);
        for point in outlook.series.forecast() {
            let (lower, upper) = point.interval.unwrap();
            let value = point.value.unwrap();
            assert!(lower <= value && value <= upper);
        }
    }
}

#[test]
fn test_invalid_config_rejected_before_fetching() {
    let config = OutlookConfig::default().with_horizon(0);
    assert!(Pipeline::new(config, &SampleSource).is_err());
}
