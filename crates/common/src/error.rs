//! Unified error type for the sync pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Search API error: {0}")]
    Search(String),

    #[error("Extraction API error: {0}")]
    Extraction(String),

    #[error("World Bank API error: {0}")]
    WorldBank(String),

    #[error("Snapshot store error: {0}")]
    Store(String),

    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
