//! Configuration loader — merges defaults, config.toml and env vars.

use common::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tavily search API key.
    #[serde(default)]
    pub tavily_api_key: String,

    /// Anthropic API key for index-value extraction.
    #[serde(default)]
    pub anthropic_api_key: String,

    /// Extraction model id.
    #[serde(default = "default_model")]
    pub extraction_model: String,

    /// Canonical snapshot document location.
    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Timing parameters.
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Minimum gap between successive search/extraction calls (ms).
    /// Rate-limit contract with the providers; 500 is the floor.
    #[serde(default = "default_lookup_gap")]
    pub lookup_gap_ms: u64,

    /// Minimum gap between successive GDP calls (ms). Floor is 200.
    #[serde(default = "default_gdp_gap")]
    pub gdp_gap_ms: u64,

    /// Snapshot age beyond which startup triggers a refresh (hours).
    #[serde(default = "default_stale_after")]
    pub stale_after_hours: i64,

    /// Periodic full-refresh interval (hours).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_hours: u64,

    /// Merged-view poll interval (seconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_model() -> String {
    llm_client::DEFAULT_MODEL.into()
}

fn default_cache_path() -> String {
    "data/cache.json".into()
}

fn default_lookup_gap() -> u64 {
    500
}

fn default_gdp_gap() -> u64 {
    200
}

fn default_stale_after() -> i64 {
    168
}

fn default_refresh_interval() -> u64 {
    168
}

fn default_poll_interval() -> u64 {
    1800
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            lookup_gap_ms: default_lookup_gap(),
            gdp_gap_ms: default_gdp_gap(),
            stale_after_hours: default_stale_after(),
            refresh_interval_hours: default_refresh_interval(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: String::new(),
            anthropic_api_key: String::new(),
            extraction_model: default_model(),
            cache_path: default_cache_path(),
            timing: TimingConfig::default(),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.tavily_api_key.is_empty() {
        issues.push("TAVILY_API_KEY is required (set in .env or environment)".into());
    }
    if config.anthropic_api_key.is_empty() {
        issues.push("ANTHROPIC_API_KEY is required (set in .env or environment)".into());
    }
    if config.extraction_model.trim().is_empty() {
        issues.push("extraction_model must not be empty".into());
    }
    if config.cache_path.trim().is_empty() {
        issues.push("cache_path must not be empty".into());
    }

    if config.timing.lookup_gap_ms < 500 {
        issues.push("timing.lookup_gap_ms must be >= 500 (provider rate limits)".into());
    }
    if config.timing.gdp_gap_ms < 200 {
        issues.push("timing.gdp_gap_ms must be >= 200 (provider rate limits)".into());
    }
    if config.timing.stale_after_hours <= 0 {
        issues.push("timing.stale_after_hours must be > 0".into());
    }
    if config.timing.refresh_interval_hours == 0 {
        issues.push("timing.refresh_interval_hours must be > 0".into());
    }
    if config.timing.poll_interval_secs == 0 {
        issues.push("timing.poll_interval_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env from the working directory or parents.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Overlay config.toml if present.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Environment variables win.
    if let Ok(key) = std::env::var("TAVILY_API_KEY") {
        config.tavily_api_key = key;
    }
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        config.anthropic_api_key = key;
    }
    if let Ok(model) = std::env::var("EXTRACTION_MODEL") {
        config.extraction_model = model;
    }
    if let Ok(path) = std::env::var("CACHE_PATH") {
        config.cache_path = path;
    }
    if let Ok(raw) = std::env::var("LOOKUP_GAP_MS") {
        config.timing.lookup_gap_ms = parse_positive_u64(&raw, "LOOKUP_GAP_MS")?;
    }
    if let Ok(raw) = std::env::var("GDP_GAP_MS") {
        config.timing.gdp_gap_ms = parse_positive_u64(&raw, "GDP_GAP_MS")?;
    }
    if let Ok(raw) = std::env::var("REFRESH_INTERVAL_HOURS") {
        config.timing.refresh_interval_hours =
            parse_positive_u64(&raw, "REFRESH_INTERVAL_HOURS")?;
    }
    if let Ok(raw) = std::env::var("POLL_INTERVAL_SECS") {
        config.timing.poll_interval_secs = parse_positive_u64(&raw, "POLL_INTERVAL_SECS")?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
