//! markets-sync — country market-index and GDP synchronization service.
//!
//! Default mode runs the long-lived daemon: a startup staleness check, a
//! periodic full-refresh trigger, and a poll task that keeps the merged
//! country view current. Flag modes run one operation in the foreground
//! and print JSON to stdout.

mod config;

use chrono::Duration as ChronoDuration;
use clap::Parser;
use common::catalog::catalog;
use common::providers::{ExtractionProvider, GdpProvider, SearchProvider};
use common::types::Country;
use common::Pacer;
use llm_client::ExtractionClient;
use refresher::{merge, Refresher, Scheduler};
use snapshot_store::{cache_status, FileSnapshotStore, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tavily_client::TavilyClient;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use worldbank_client::WorldBankClient;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "markets-sync", version, about = "Country market-index and GDP sync service")]
struct Cli {
    /// Print cache status as JSON and exit.
    #[arg(long)]
    status: bool,

    /// Print the raw cached snapshot as JSON and exit.
    #[arg(long)]
    snapshot: bool,

    /// Print the merged country view as JSON and exit.
    #[arg(long)]
    merged: bool,

    /// Run one full refresh in the foreground and exit.
    #[arg(long)]
    refresh: bool,

    /// Refresh a single country by id and print its readings.
    #[arg(long, value_name = "ID")]
    country: Option<String>,
}

struct App {
    store: Arc<dyn SnapshotStore>,
    refresher: Arc<Refresher>,
    scheduler: Arc<Scheduler>,
    poll_interval: Duration,
}

fn build_app(cfg: &AppConfig) -> App {
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&cfg.cache_path));

    let search: Arc<dyn SearchProvider> = Arc::new(TavilyClient::new(&cfg.tavily_api_key));
    let extraction: Arc<dyn ExtractionProvider> = Arc::new(ExtractionClient::new(
        &cfg.anthropic_api_key,
        &cfg.extraction_model,
    ));
    let gdp: Arc<dyn GdpProvider> = Arc::new(WorldBankClient::new());

    let refresher = Arc::new(Refresher::new(
        catalog(),
        search,
        extraction,
        gdp,
        store.clone(),
        Pacer::with_interval(Duration::from_millis(cfg.timing.lookup_gap_ms)),
        Pacer::with_interval(Duration::from_millis(cfg.timing.gdp_gap_ms)),
    ));

    let scheduler = Scheduler::new(
        refresher.clone(),
        store.clone(),
        ChronoDuration::hours(cfg.timing.stale_after_hours),
        Duration::from_secs(cfg.timing.refresh_interval_hours * 3600),
    );

    App {
        store,
        refresher,
        scheduler,
        poll_interval: Duration::from_secs(cfg.timing.poll_interval_secs),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_daemon(app: App) {
    info!("markets-sync starting up");

    // Merged view, rebuilt from the snapshot on a poll interval. The
    // presentation layer reads this; it never touches the providers.
    let view: Arc<RwLock<Vec<Country>>> = Arc::new(RwLock::new(merge(
        app.refresher.catalog(),
        app.store.get().as_ref(),
    )));

    app.scheduler.check_startup();
    let mut periodic = app.scheduler.spawn_periodic();

    let mut poll = {
        let view = view.clone();
        let store = app.store.clone();
        let refresher = app.refresher.clone();
        let interval = app.poll_interval;
        tokio::spawn(async move {
            loop {
                sleep(interval).await;
                let snapshot = store.get();
                let merged = merge(refresher.catalog(), snapshot.as_ref());
                *view.write().await = merged;
                info!(
                    live = snapshot.is_some(),
                    "Merged view refreshed from cache"
                );
            }
        })
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = &mut periodic => {
            error!("Periodic refresh task exited unexpectedly: {:?}", result);
        }
        result = &mut poll => {
            error!("Merged-view poll task exited unexpectedly: {:?}", result);
        }
    }

    periodic.abort();
    poll.abort();
    info!("markets-sync stopped");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "markets_sync=info,refresher=info,snapshot_store=info,\
                 tavily_client=info,llm_client=info,worldbank_client=info",
            )
        }))
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let app = build_app(&cfg);

    if cli.status {
        print_json(&cache_status(app.store.as_ref()));
        return;
    }

    if cli.snapshot {
        match app.store.get() {
            Some(snapshot) => print_json(&snapshot),
            None => {
                error!("No snapshot available yet; run a refresh first");
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.merged {
        let merged = merge(app.refresher.catalog(), app.store.get().as_ref());
        print_json(&merged);
        return;
    }

    if let Some(country_id) = cli.country {
        match app.scheduler.refresh_country(&country_id).await {
            Ok(readings) => print_json(&readings),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.refresh {
        let snapshot = app.refresher.run_full().await;
        info!(
            countries = snapshot.data.len(),
            "Full refresh complete"
        );
        print_json(&cache_status(app.store.as_ref()));
        return;
    }

    run_daemon(app).await;
}
