use macro_forecast::config::{IndicatorSpec, OutlookConfig, DEFAULT_HORIZON};
use macro_forecast::error::OutlookError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_partial_json_takes_defaults() {
    let config = OutlookConfig::from_json_str(r#"{"country": "KAZ", "horizon": 6}"#).unwrap();

    assert_eq!(config.country, "KAZ");
    assert_eq!(config.horizon, 6);
    assert_eq!(config.start_year, 2010);
    assert_eq!(config.indicators.len(), 3);
    assert_eq!(config.indicators[0], IndicatorSpec::new("NY.GDP.MKTP.CD", "GDP"));
}

#[test]
fn test_zero_horizon_rejected() {
    let result = OutlookConfig::from_json_str(r#"{"horizon": 0}"#);
    assert!(matches!(result, Err(OutlookError::InvalidParameter(_))));
}

#[test]
fn test_reversed_years_rejected() {
    let config = OutlookConfig::default().with_years(2024, 2010);
    assert!(config.validate().is_err());
}

#[test]
fn test_bad_interval_level_rejected() {
    let result = OutlookConfig::from_json_str(r#"{"interval_level": 1.2}"#);
    assert!(result.is_err());
}

#[test]
fn test_round_trip_through_file() {
    let config = OutlookConfig::default()
        .with_years(2000, 2020)
        .with_horizon(DEFAULT_HORIZON + 1)
        .with_indicators(vec![IndicatorSpec::new("SL.UEM.TOTL.ZS", "Unemployment")]);

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = OutlookConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    let result = OutlookConfig::from_json_file("/nonexistent/outlook.json");
    assert!(matches!(result, Err(OutlookError::Io(_))));
}
