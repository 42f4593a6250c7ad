//! Provider trait seams between the orchestrator and external adapters.
//!
//! The orchestrator only depends on these traits; production wiring plugs
//! in the Tavily, Anthropic and World Bank clients, tests plug in fakes.

use crate::error::Error;
use crate::types::{Country, ExtractedValue, GdpReading, SearchContent};
use async_trait::async_trait;

/// Free-text search for a `{index, country}` pair.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_index(&self, index_name: &str, country: &str)
        -> Result<SearchContent, Error>;
}

/// Bounded natural-language extraction of `{value, found}` from raw text.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    async fn extract_index(&self, content: &str, index_name: &str)
        -> Result<ExtractedValue, Error>;
}

/// Macro-statistics lookup of a country's most recent GDP observation.
#[async_trait]
pub trait GdpProvider: Send + Sync {
    async fn fetch_gdp(&self, country: &Country) -> Result<GdpReading, Error>;
}
