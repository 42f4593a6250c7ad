//! Domain types shared across the pipeline.
//!
//! Snapshot and status documents keep the camelCase field names of the
//! persisted JSON format so existing cache files and consumers keep working.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Catalogue types ───────────────────────────────────────────────────

/// World region a country belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Africa,
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Europe,
    Asia,
    #[serde(rename = "Middle East")]
    MiddleEast,
    Oceania,
}

/// A named sub-index with its baseline display value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndex {
    pub name: String,
    pub value: String,
}

/// One entry of the static reference dataset.
///
/// Baseline values are the ultimate fallback when no live reading exists.
/// `tracked_indices` is the ordered list of lookup names used by the
/// acquisition pipeline; for multi-index countries it matches the `indices`
/// entries by exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    pub flag: String,
    pub region: Region,
    pub currency: String,
    pub currency_symbol: String,
    /// Baseline GDP in trillions of USD.
    pub gdp_trillions: f64,
    /// Display name of the country's market index (or combined label).
    pub index_name: String,
    /// Baseline index value for single-index countries.
    pub market_value: String,
    /// Baseline sub-indices for multi-index countries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<MarketIndex>>,
    /// Ordered lookup names driving the external acquisition.
    pub tracked_indices: Vec<String>,
    /// ISO 3166-1 alpha-3 code for the macro-statistics provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

// ── Live reading types ────────────────────────────────────────────────

/// A single index lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReading {
    pub value: Option<String>,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndexReading {
    pub fn not_found() -> Self {
        Self {
            value: None,
            found: false,
            error: None,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            value: None,
            found: false,
            error: Some(message),
        }
    }
}

/// A GDP lookup result, in trillions of USD rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpReading {
    pub gdp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub found: bool,
}

impl GdpReading {
    pub fn not_found() -> Self {
        Self {
            gdp: None,
            year: None,
            found: false,
        }
    }
}

/// All live readings for one country within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySnapshot {
    pub indices: BTreeMap<String, IndexReading>,
    pub gdp: GdpReading,
}

/// The complete persisted snapshot document. Replaced wholesale per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub updated_at: DateTime<Utc>,
    pub data: BTreeMap<String, CountrySnapshot>,
}

/// Cache status as exposed at the service boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub has_data: bool,
    pub updated_at: Option<DateTime<Utc>>,
    /// Snapshot age in hours, 2dp. `None` when no snapshot exists.
    pub age_hours: Option<f64>,
    pub countries_count: usize,
}

// ── Provider payloads ─────────────────────────────────────────────────

/// Free-text search output for one index lookup.
#[derive(Debug, Clone)]
pub struct SearchContent {
    pub query: String,
    pub content: String,
}

/// Structured output of the extraction provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    #[serde(default)]
    pub value: Option<String>,
    pub found: bool,
}
