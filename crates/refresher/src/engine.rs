//! Acquisition orchestrator.
//!
//! One full run walks the catalogue strictly sequentially: the GDP phase
//! first, then the two-stage search/extraction lookups for every tracked
//! index. Pacers gate every external call — the lookup gap (≥500 ms) and
//! GDP gap (≥200 ms) are rate-limit contracts with the providers, not
//! tunables. Any provider failure is confined to the single reading it
//! was producing; a run always ends with one complete snapshot covering
//! every tracked country.

use chrono::Utc;
use common::providers::{ExtractionProvider, GdpProvider, SearchProvider};
use common::types::{Country, CountrySnapshot, GdpReading, IndexReading, Snapshot};
use common::{Error, Pacer};
use snapshot_store::SnapshotStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct Refresher {
    catalog: Vec<Country>,
    search: Arc<dyn SearchProvider>,
    extraction: Arc<dyn ExtractionProvider>,
    gdp: Arc<dyn GdpProvider>,
    store: Arc<dyn SnapshotStore>,
    lookup_pacer: Pacer,
    gdp_pacer: Pacer,
}

impl Refresher {
    pub fn new(
        catalog: Vec<Country>,
        search: Arc<dyn SearchProvider>,
        extraction: Arc<dyn ExtractionProvider>,
        gdp: Arc<dyn GdpProvider>,
        store: Arc<dyn SnapshotStore>,
        lookup_pacer: Pacer,
        gdp_pacer: Pacer,
    ) -> Self {
        Self {
            catalog,
            search,
            extraction,
            gdp,
            store,
            lookup_pacer,
            gdp_pacer,
        }
    }

    pub fn catalog(&self) -> &[Country] {
        &self.catalog
    }

    /// Full refresh: GDP for every country, then every tracked index, then
    /// one atomic snapshot write. Individual failures are recorded inline
    /// and never abort the run.
    pub async fn run_full(&self) -> Snapshot {
        info!("Starting full update (indices + GDP)...");

        let mut gdp_readings = self.fetch_all_gdp().await;

        info!("Fetching stock indices...");
        let mut data = BTreeMap::new();
        for country in &self.catalog {
            info!("Fetching {}...", country.name);
            let indices = self.fetch_country_indices(country).await;
            let gdp = gdp_readings
                .remove(&country.id)
                .unwrap_or_else(GdpReading::not_found);
            data.insert(country.id.clone(), CountrySnapshot { indices, gdp });
        }

        let snapshot = Snapshot {
            updated_at: Utc::now(),
            data,
        };

        if let Err(e) = self.store.put(&snapshot) {
            // Readers degrade to the previous snapshot (or the static
            // baseline); the run result is still returned to the caller.
            error!("Failed to persist snapshot: {}", e);
        }

        info!("Update complete");
        snapshot
    }

    /// On-demand refresh of one country's indices. Does not touch GDP and
    /// does not persist; the transient readings go back to the caller.
    pub async fn run_single(
        &self,
        country_id: &str,
    ) -> Result<BTreeMap<String, IndexReading>, Error> {
        let country = self
            .catalog
            .iter()
            .find(|c| c.id == country_id)
            .ok_or_else(|| Error::UnknownCountry(country_id.to_string()))?;

        info!("Refreshing {} on demand...", country.name);
        Ok(self.fetch_country_indices(country).await)
    }

    /// GDP phase: one paced provider call per country, failures isolated.
    async fn fetch_all_gdp(&self) -> BTreeMap<String, GdpReading> {
        info!("Fetching GDP data...");
        let mut readings = BTreeMap::new();

        for country in &self.catalog {
            self.gdp_pacer.wait().await;
            let reading = match self.gdp.fetch_gdp(country).await {
                Ok(reading) => {
                    if let (Some(gdp), Some(year)) = (reading.gdp, reading.year.as_deref()) {
                        info!("  {}: ${}T ({})", country.id, gdp, year);
                    }
                    reading
                }
                Err(e) => {
                    warn!("  GDP lookup failed for {}: {}", country.id, e);
                    GdpReading::not_found()
                }
            };
            readings.insert(country.id.clone(), reading);
        }

        info!("GDP fetch complete");
        readings
    }

    async fn fetch_country_indices(&self, country: &Country) -> BTreeMap<String, IndexReading> {
        let mut indices = BTreeMap::new();
        for index_name in &country.tracked_indices {
            let reading = self.fetch_index(index_name, &country.name).await;
            info!(
                "  {}: {}",
                index_name,
                reading.value.as_deref().unwrap_or("not found")
            );
            indices.insert(index_name.clone(), reading);
        }
        indices
    }

    /// Two-stage lookup for one index: paced search, then paced extraction.
    /// Errors at either stage collapse into a failed reading.
    async fn fetch_index(&self, index_name: &str, country_name: &str) -> IndexReading {
        let result: Result<IndexReading, Error> = async {
            self.lookup_pacer.wait().await;
            let search = self.search.search_index(index_name, country_name).await?;

            self.lookup_pacer.wait().await;
            let extracted = self
                .extraction
                .extract_index(&search.content, index_name)
                .await?;

            Ok(IndexReading {
                value: extracted.value,
                found: extracted.found,
                error: None,
            })
        }
        .await;

        match result {
            Ok(reading) => reading,
            Err(e) => {
                warn!("  Error fetching {}: {}", index_name, e);
                IndexReading::failed(e.to_string())
            }
        }
    }
}
