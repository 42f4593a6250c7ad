//! World Bank GDP client (free, no API key).
//!
//! Queries the NY.GDP.MKTP.CD indicator (GDP in current USD) over a rolling
//! recent window and reduces the series to the newest non-null observation,
//! converted to trillions of USD at 2 decimal places.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use common::providers::GdpProvider;
use common::types::{Country, GdpReading};
use common::Error;
use serde::Deserialize;
use tracing::{debug, warn};

const WORLDBANK_API_URL: &str = "https://api.worldbank.org/v2";
const GDP_INDICATOR: &str = "NY.GDP.MKTP.CD";
/// Years of history requested per lookup.
const WINDOW_YEARS: i32 = 4;

/// World Bank API client.
#[derive(Debug, Clone)]
pub struct WorldBankClient {
    client: reqwest::Client,
}

/// One yearly observation of the indicator series.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub date: String,
    pub value: Option<f64>,
}

/// Pull the observation rows out of the `[metadata, rows]` response body.
/// Rows that fail to parse are skipped rather than failing the lookup.
fn parse_series(body: &serde_json::Value) -> Vec<Observation> {
    body.get(1)
        .and_then(|rows| rows.as_array())
        .map(|rows| {
            rows.iter()
                .filter_map(|row| serde_json::from_value(row.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// The most recent observation carrying a value, ties broken toward the
/// latest date. World Bank dates are plain years, so a string sort is a
/// chronological sort.
fn select_latest(mut series: Vec<Observation>) -> Option<(String, f64)> {
    series.sort_by(|a, b| b.date.cmp(&a.date));
    series
        .into_iter()
        .find_map(|obs| obs.value.map(|v| (obs.date, v)))
}

/// Convert current USD to trillions, rounded to 2 decimal places.
fn to_trillions(usd: f64) -> f64 {
    (usd / 1_000_000_000_000.0 * 100.0).round() / 100.0
}

impl WorldBankClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("markets-sync/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build World Bank HTTP client");

        Self { client }
    }
}

impl Default for WorldBankClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GdpProvider for WorldBankClient {
    async fn fetch_gdp(&self, country: &Country) -> Result<GdpReading, Error> {
        let Some(code) = country.country_code.as_deref() else {
            warn!("No country code mapping for: {}", country.id);
            return Ok(GdpReading::not_found());
        };

        let this_year = Utc::now().year();
        let url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page=5&date={}:{}",
            WORLDBANK_API_URL,
            code,
            GDP_INDICATOR,
            this_year - WINDOW_YEARS,
            this_year
        );
        debug!("Fetching GDP: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::WorldBank(format!("HTTP error for {}: {}", code, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::WorldBank(format!(
                "World Bank returned {} for {}: {}",
                status,
                code,
                common::text::truncate(&body, 500)
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::WorldBank(format!("JSON parse error for {}: {}", code, e)))?;

        match select_latest(parse_series(&body)) {
            Some((year, usd)) => Ok(GdpReading {
                gdp: Some(to_trillions(usd)),
                year: Some(year),
                found: true,
            }),
            None => {
                warn!("No GDP data found for {}", code);
                Ok(GdpReading::not_found())
            }
        }
    }
}
