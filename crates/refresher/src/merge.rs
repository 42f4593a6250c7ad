//! Reconciliation merge: static baseline ⊕ latest snapshot.
//!
//! Pure and total — every catalogue entry comes back exactly once, in
//! catalogue order, with live readings overlaid only where `found` is
//! true. A missing snapshot (cold cache) yields the baseline unchanged.

use common::types::{Country, CountrySnapshot, Snapshot};

/// Produce the display-ready view for the presentation layer.
pub fn merge(catalog: &[Country], snapshot: Option<&Snapshot>) -> Vec<Country> {
    catalog
        .iter()
        .map(|country| {
            match snapshot.and_then(|s| s.data.get(&country.id)) {
                Some(live) => overlay(country, live),
                None => country.clone(),
            }
        })
        .collect()
}

fn overlay(country: &Country, live: &CountrySnapshot) -> Country {
    let mut merged = country.clone();

    if live.gdp.found {
        if let Some(gdp) = live.gdp.gdp {
            merged.gdp_trillions = gdp;
        }
    }

    match &mut merged.indices {
        // Multi-index country: overlay each sub-index by exact name match.
        Some(sub_indices) => {
            for sub in sub_indices.iter_mut() {
                if let Some(reading) = live.indices.get(&sub.name) {
                    if reading.found {
                        if let Some(value) = &reading.value {
                            sub.value = value.clone();
                        }
                    }
                }
            }
        }
        // Single-index country: overlay the market value from the sole
        // tracked index name.
        None => {
            if let [sole] = country.tracked_indices.as_slice() {
                if let Some(reading) = live.indices.get(sole) {
                    if reading.found {
                        if let Some(value) = &reading.value {
                            merged.market_value = value.clone();
                        }
                    }
                }
            }
        }
    }

    merged
}
