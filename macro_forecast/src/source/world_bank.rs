//! World Bank Indicators API (v2) client
//!
//! `GET {base}/country/{country}/indicator/{code}?format=json&date=a:b`
//! answers `[paging, [observation, ...]]` on success and
//! `[{"message": [...]}]` when the request is rejected.

use crate::data::RawRecord;
use crate::error::{OutlookError, Result};
use crate::source::DataSource;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

const PER_PAGE: u32 = 1000;

#[derive(Debug, Deserialize)]
struct Paging {
    page: u32,
    pages: u32,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    id: String,
    #[serde(default)]
    value: String,
}

/// One decoded response page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<RawRecord>,
    pub page: u32,
    pub pages: u32,
}

/// Blocking HTTP source backed by the World Bank API
#[derive(Debug, Clone)]
pub struct WorldBankSource {
    client: Client,
    base_url: String,
}

impl WorldBankSource {
    /// Client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Client against another deployment of the same API
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OutlookError::fetch("*", format!("cannot build HTTP client: {}", e), false))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn fetch_page(
        &self,
        code: &str,
        country: &str,
        years: &RangeInclusive<i32>,
        page: u32,
    ) -> Result<Page> {
        let url = format!("{}/country/{}/indicator/{}", self.base_url, country, code);
        let query = [
            ("format", "json".to_string()),
            ("date", format!("{}:{}", years.start(), years.end())),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];
        debug!(%url, page, "requesting indicator page");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| transport_error(code, e))?;

        let status = response.status();
        if !status.is_success() {
            let retryable = status.is_server_error() || status.as_u16() == 429;
            return Err(OutlookError::fetch(
                code,
                format!("upstream answered {}", status),
                retryable,
            ));
        }

        let body = response.text().map_err(|e| transport_error(code, e))?;
        parse_page(code, &body)
    }
}

fn transport_error(code: &str, err: reqwest::Error) -> OutlookError {
    let retryable = err.is_timeout() || err.is_connect();
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };
    OutlookError::fetch(code, message, retryable)
}

/// Decode one response body.
///
/// A missing data array (the API sends `null` when nothing matches) is an
/// empty page. A `date` that is not a plain year is an alignment error.
pub fn parse_page(code: &str, body: &str) -> Result<Page> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| OutlookError::fetch(code, format!("malformed response: {}", e), false))?;

    let parts = document
        .as_array()
        .ok_or_else(|| OutlookError::fetch(code, "response is not a JSON array", false))?;
    let head = parts
        .first()
        .ok_or_else(|| OutlookError::fetch(code, "empty response", false))?;

    if let Some(messages) = head.get("message") {
        let messages: Vec<ApiMessage> = serde_json::from_value(messages.clone()).unwrap_or_default();
        let text = messages
            .iter()
            .map(|m| format!("{} {}", m.id, m.value).trim().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(OutlookError::fetch(code, format!("API error: {}", text), false));
    }

    let paging: Paging = serde_json::from_value(head.clone())
        .map_err(|e| OutlookError::fetch(code, format!("bad paging header: {}", e), false))?;

    let observations: Vec<Observation> = match parts.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(data) => serde_json::from_value(data.clone())
            .map_err(|e| OutlookError::fetch(code, format!("bad observations: {}", e), false))?,
    };

    let records = observations
        .into_iter()
        .map(|obs| {
            let year = obs.date.trim().parse::<i32>().map_err(|_| {
                OutlookError::Alignment(format!(
                    "indicator {} reported non-integer year '{}'",
                    code, obs.date
                ))
            })?;
            Ok(RawRecord::new(year, obs.value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Page {
        records,
        page: paging.page,
        pages: paging.pages,
    })
}

impl DataSource for WorldBankSource {
    fn fetch(&self, code: &str, country: &str, years: RangeInclusive<i32>) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let decoded = self.fetch_page(code, country, &years, page)?;
            records.extend(decoded.records);
            if decoded.page >= decoded.pages {
                break;
            }
            page += 1;
        }

        info!(code, country, records = records.len(), "fetched indicator");
        Ok(records)
    }

    fn name(&self) -> &str {
        "world-bank"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success_page() {
        let body = r#"[
            {"page": 1, "pages": 1, "per_page": "1000", "total": 3},
            [
                {"indicator": {"id": "FP.CPI.TOTL.ZG", "value": "Inflation"}, "date": "2023", "value": 10.0},
                {"indicator": {"id": "FP.CPI.TOTL.ZG", "value": "Inflation"}, "date": "2022", "value": null},
                {"indicator": {"id": "FP.CPI.TOTL.ZG", "value": "Inflation"}, "date": "2021", "value": 10.8}
            ]
        ]"#;

        let page = parse_page("FP.CPI.TOTL.ZG", body).unwrap();

        assert_eq!(
            page.records,
            vec![
                RawRecord::new(2023, Some(10.0)),
                RawRecord::new(2022, None),
                RawRecord::new(2021, Some(10.8)),
            ]
        );
        assert_eq!((page.page, page.pages), (1, 1));
    }

    #[test]
    fn test_parse_null_data_is_empty() {
        let body = r#"[{"page": 0, "pages": 0, "per_page": 50, "total": 0}, null]"#;
        let page = parse_page("X", body).unwrap();
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_parse_error_document() {
        let body = r#"[{"message": [{"id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid"}]}]"#;
        let err = parse_page("X", body).unwrap_err();

        match err {
            OutlookError::Fetch { message, retryable, .. } => {
                assert!(message.contains("120"));
                assert!(!retryable);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_integer_year() {
        let body = r#"[{"page": 1, "pages": 1}, [{"date": "2023Q1", "value": 1.0}]]"#;
        assert!(matches!(
            parse_page("X", body),
            Err(OutlookError::Alignment(_))
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_page("X", "<html>"),
            Err(OutlookError::Fetch { .. })
        ));
    }
}
