// src/fetcher/mod.rs
//! Source fetcher: cache → live portal → built-in seed.
//!
//! `fetch` never fails. A fresh cache entry is returned verbatim; otherwise the
//! live source is asked, and any error or an empty answer degrades to the seed
//! dataset. Whatever is returned on a non-cached path is written to the cache
//! exactly once, so a portal outage is not retried until the entry expires.

pub mod normalize;
pub mod providers;
pub mod seed;
pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::cache::{cache_key, CacheStore, FileCache};
use crate::clock::{Clock, SystemClock};
use crate::config::PortalConfig;
use crate::dataset::{Category, Dataset, Filters};
use crate::fetcher::normalize::{Normalizer, ProductionEstimator};
use crate::fetcher::providers::PortalClient;
use crate::fetcher::seed::seed_dataset;
use crate::fetcher::types::{FetchTier, Fetched, LiveRequest, LiveSource};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "fetch_tier_total",
            "Datasets served, labelled by category and tier."
        );
        describe_counter!(
            "fetch_live_errors_total",
            "Live portal fetch/parse errors."
        );
        describe_counter!(
            "cache_write_errors_total",
            "Datasets that could not be persisted to the cache."
        );
        describe_histogram!("fetch_live_ms", "Portal round-trip time in milliseconds.");
    });
}

pub struct SourceFetcher {
    live: Arc<dyn LiveSource>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    normalizer: Normalizer,
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SourceFetcher {
    pub fn new(live: Arc<dyn LiveSource>, cache: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            live,
            cache,
            clock,
            normalizer: Normalizer::default(),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Portal client + file cache + wall clock, as configured.
    pub fn from_config(cfg: &PortalConfig) -> Result<Self> {
        let live = PortalClient::new(cfg.clone())?;
        let cache = FileCache::new(cfg.cache_dir.clone())?;
        Ok(Self::new(Arc::new(live), Arc::new(cache), Arc::new(SystemClock)))
    }

    /// Swap the heuristic used for agricultural production estimates.
    pub fn with_estimator(mut self, estimator: Arc<dyn ProductionEstimator>) -> Self {
        self.normalizer = Normalizer::new(estimator);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    fn lock_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut g = self.key_locks.lock().expect("key lock map poisoned");
        g.entry(key.to_string()).or_default().clone()
    }

    /// Resolve a dataset through the cache, live and fallback tiers.
    pub async fn fetch(&self, category: Category, filters: &Filters) -> Fetched {
        ensure_metrics_described();

        let key = cache_key(category, filters);
        // Serialize check-then-write per key so concurrent misses don't both go live.
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let now = self.clock.now_unix();
        if let Some(entry) = self.cache.load(&key) {
            if entry.is_fresh(now, category.ttl_secs()) {
                tracing::debug!(target: "fetcher", %category, key = %key, age = entry.age_secs(now), "cache hit");
                return self.served(FetchTier::Cached, key, entry.dataset);
            }
            tracing::debug!(target: "fetcher", %category, key = %key, age = entry.age_secs(now), "cache entry expired");
        }

        let req = LiveRequest {
            category,
            filters: filters.clone(),
        };
        let (tier, dataset) = match self.live.fetch_records(&req).await {
            Ok(rows) => {
                let ds = self.normalizer.normalize(&req, &rows);
                if ds.is_empty() {
                    tracing::info!(target: "fetcher", %category, source = self.live.name(), "live fetch returned no records, using seed");
                    (FetchTier::Fallback, seed_dataset(category, filters))
                } else {
                    (FetchTier::Live, ds)
                }
            }
            Err(e) => {
                tracing::warn!(target: "fetcher", error = ?e, %category, source = self.live.name(), "live fetch failed, using seed");
                counter!("fetch_live_errors_total", "category" => category.as_str()).increment(1);
                (FetchTier::Fallback, seed_dataset(category, filters))
            }
        };

        if let Err(e) = self.cache.store(&key, &dataset, self.clock.now_unix()) {
            tracing::warn!(target: "fetcher", error = ?e, key = %key, "cache write failed");
            counter!("cache_write_errors_total").increment(1);
        }

        self.served(tier, key, dataset)
    }

    fn served(&self, tier: FetchTier, key: String, dataset: Dataset) -> Fetched {
        counter!(
            "fetch_tier_total",
            "category" => dataset.category.as_str(),
            "tier" => tier.as_str()
        )
        .increment(1);
        tracing::info!(
            target: "fetcher",
            category = %dataset.category,
            tier = tier.as_str(),
            records = dataset.len(),
            key = %key,
            "dataset served"
        );
        Fetched { tier, key, dataset }
    }
}
