//! Refresh scheduling: startup staleness check, periodic trigger, and
//! on-demand dispatch.
//!
//! Full refreshes are fire-and-forget: the caller gets an accepted/rejected
//! answer, never completion — progress is observable only through the cache
//! status. Overlapping full runs are rejected by an atomic in-progress
//! guard, so the last-writer-wins race between concurrent runs cannot
//! occur. Single-country refreshes run synchronously and are not guarded.

use chrono::Duration as ChronoDuration;
use common::types::IndexReading;
use common::Error;
use snapshot_store::SnapshotStore;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::engine::Refresher;

pub struct Scheduler {
    refresher: Arc<Refresher>,
    store: Arc<dyn SnapshotStore>,
    stale_after: ChronoDuration,
    refresh_interval: Duration,
    running: AtomicBool,
}

/// Whether a startup refresh is needed for a cache of the given age.
/// An absent cache always needs one.
pub fn needs_refresh(age: Option<ChronoDuration>, stale_after: ChronoDuration) -> bool {
    match age {
        Some(age) => age > stale_after,
        None => true,
    }
}

/// Resets the in-progress flag when the run finishes or unwinds.
struct RunningGuard<'a>(&'a Scheduler);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::SeqCst);
    }
}

impl Scheduler {
    pub fn new(
        refresher: Arc<Refresher>,
        store: Arc<dyn SnapshotStore>,
        stale_after: ChronoDuration,
        refresh_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            refresher,
            store,
            stale_after,
            refresh_interval,
            running: AtomicBool::new(false),
        })
    }

    /// True while a full refresh is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Startup trigger: dispatch a full refresh if the cache is absent or
    /// older than the staleness threshold. Never blocks startup.
    pub fn check_startup(self: &Arc<Self>) {
        match self.store.age() {
            Some(age) if !needs_refresh(Some(age), self.stale_after) => {
                let hours = age.num_milliseconds() as f64 / 3_600_000.0;
                info!("Cache is fresh ({:.1} hours old)", hours);
            }
            _ => {
                info!("Cache is stale or empty. Starting initial fetch...");
                self.dispatch_full();
            }
        }
    }

    /// Fire-and-forget full refresh. Returns whether the trigger was
    /// accepted; a run already in flight rejects it.
    pub fn dispatch_full(self: &Arc<Self>) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Full refresh already in progress; trigger ignored");
            return false;
        }

        let scheduler = self.clone();
        tokio::spawn(async move {
            // Clears the guard even if run_full unwinds; a panicking run
            // must not wedge every future trigger.
            let _reset = RunningGuard(&scheduler);
            scheduler.refresher.run_full().await;
        });
        true
    }

    /// Periodic trigger task: one full refresh per interval.
    pub fn spawn_periodic(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(scheduler.refresh_interval).await;
                info!("Scheduled update starting...");
                scheduler.dispatch_full();
            }
        })
    }

    /// Synchronous single-country refresh for on-demand requests.
    pub async fn refresh_country(
        &self,
        country_id: &str,
    ) -> Result<BTreeMap<String, IndexReading>, Error> {
        self.refresher.run_single(country_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::providers::{ExtractionProvider, GdpProvider, SearchProvider};
    use common::types::{
        Country, ExtractedValue, GdpReading, Region, SearchContent,
    };
    use common::Pacer;
    use snapshot_store::MemorySnapshotStore;

    #[test]
    fn test_needs_refresh_stale_cache() {
        let threshold = ChronoDuration::hours(168);
        assert!(needs_refresh(Some(ChronoDuration::hours(200)), threshold));
    }

    #[test]
    fn test_needs_refresh_fresh_cache() {
        let threshold = ChronoDuration::hours(168);
        assert!(!needs_refresh(Some(ChronoDuration::hours(1)), threshold));
    }

    #[test]
    fn test_needs_refresh_absent_cache() {
        let threshold = ChronoDuration::hours(168);
        assert!(needs_refresh(None, threshold));
    }

    struct SlowSearch;

    #[async_trait]
    impl SearchProvider for SlowSearch {
        async fn search_index(&self, _: &str, _: &str) -> Result<SearchContent, Error> {
            sleep(Duration::from_millis(50)).await;
            Ok(SearchContent {
                query: String::new(),
                content: "index at 1,000.00".into(),
            })
        }
    }

    struct StubExtraction;

    #[async_trait]
    impl ExtractionProvider for StubExtraction {
        async fn extract_index(&self, _: &str, _: &str) -> Result<ExtractedValue, Error> {
            Ok(ExtractedValue {
                value: Some("1,000.00".into()),
                found: true,
            })
        }
    }

    struct StubGdp;

    #[async_trait]
    impl GdpProvider for StubGdp {
        async fn fetch_gdp(&self, _: &Country) -> Result<GdpReading, Error> {
            Ok(GdpReading::not_found())
        }
    }

    fn one_country() -> Vec<Country> {
        vec![Country {
            id: "aaa".into(),
            name: "Aland".into(),
            flag: "🏳️".into(),
            region: Region::Europe,
            currency: "Euro".into(),
            currency_symbol: "€".into(),
            gdp_trillions: 1.0,
            index_name: "AAX Composite".into(),
            market_value: "1,000.00".into(),
            indices: None,
            tracked_indices: vec!["AAX Composite".into()],
            country_code: Some("AAA".into()),
            lat: 0.0,
            lng: 0.0,
        }]
    }

    fn slow_scheduler(store: Arc<MemorySnapshotStore>) -> Arc<Scheduler> {
        let refresher = Arc::new(Refresher::new(
            one_country(),
            Arc::new(SlowSearch),
            Arc::new(StubExtraction),
            Arc::new(StubGdp),
            store.clone(),
            Pacer::with_interval(Duration::from_millis(1)),
            Pacer::with_interval(Duration::from_millis(1)),
        ));
        Scheduler::new(
            refresher,
            store,
            ChronoDuration::hours(168),
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn test_overlapping_full_runs_are_rejected() {
        let store = Arc::new(MemorySnapshotStore::new());
        let scheduler = slow_scheduler(store.clone());

        assert!(scheduler.dispatch_full(), "first trigger accepted");
        assert!(!scheduler.dispatch_full(), "overlapping trigger rejected");
        assert!(scheduler.is_running());

        // After the run completes, the guard clears and the snapshot exists.
        sleep(Duration::from_millis(300)).await;
        assert!(!scheduler.is_running());
        assert!(store.get().is_some());
        assert!(scheduler.dispatch_full(), "guard reopens after completion");
    }

    struct PanickingSearch;

    #[async_trait]
    impl SearchProvider for PanickingSearch {
        async fn search_index(&self, _: &str, _: &str) -> Result<SearchContent, Error> {
            panic!("simulated provider bug");
        }
    }

    #[tokio::test]
    async fn test_guard_clears_when_run_panics() {
        let store = Arc::new(MemorySnapshotStore::new());
        let refresher = Arc::new(Refresher::new(
            one_country(),
            Arc::new(PanickingSearch),
            Arc::new(StubExtraction),
            Arc::new(StubGdp),
            store.clone(),
            Pacer::with_interval(Duration::from_millis(1)),
            Pacer::with_interval(Duration::from_millis(1)),
        ));
        let scheduler = Scheduler::new(
            refresher,
            store,
            ChronoDuration::hours(168),
            Duration::from_secs(3600),
        );

        assert!(scheduler.dispatch_full(), "first trigger accepted");
        sleep(Duration::from_millis(200)).await;

        assert!(!scheduler.is_running(), "panicking run must clear the guard");
        assert!(scheduler.dispatch_full(), "triggers stay usable after a panic");
    }

    #[tokio::test]
    async fn test_startup_check_dispatches_on_cold_cache() {
        let store = Arc::new(MemorySnapshotStore::new());
        let scheduler = slow_scheduler(store.clone());

        scheduler.check_startup();
        assert!(scheduler.is_running(), "cold cache triggers a refresh");

        sleep(Duration::from_millis(300)).await;
        assert!(store.get().is_some());
    }

    #[tokio::test]
    async fn test_startup_check_skips_fresh_cache() {
        let store = Arc::new(MemorySnapshotStore::new());
        // Seed a fresh snapshot so the startup check has nothing to do.
        {
            let seeder = slow_scheduler(store.clone());
            assert!(seeder.dispatch_full());
            sleep(Duration::from_millis(300)).await;
        }

        let scheduler = slow_scheduler(store.clone());
        scheduler.check_startup();
        assert!(!scheduler.is_running(), "fresh cache must not trigger");
    }

    #[tokio::test]
    async fn test_refresh_country_passes_through_unknown_ids() {
        let store = Arc::new(MemorySnapshotStore::new());
        let scheduler = slow_scheduler(store);
        let err = scheduler
            .refresh_country("xyz")
            .await
            .expect_err("unknown id");
        assert!(matches!(err, Error::UnknownCountry(_)));
    }
}
