//! Shared domain types for the markets-sync pipeline.

pub mod catalog;
pub mod error;
pub mod pace;
pub mod providers;
pub mod text;
pub mod types;

pub use error::Error;
pub use pace::Pacer;
pub use types::{
    CacheStatus, Country, CountrySnapshot, ExtractedValue, GdpReading, IndexReading, MarketIndex,
    Region, SearchContent, Snapshot,
};
