//! Cache store: datasets keyed by request parameters, stamped with the time they
//! were written.
//!
//! Entries are never evicted. An expired entry is simply ignored by the fetcher
//! and overwritten by the next successful fetch of the same key, so storage grows
//! with the number of distinct keys ever requested.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::dataset::{Category, Dataset, Filters};

/// Bump when the persisted envelope or record shapes change.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Persisted envelope around a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub schema_version: u32,
    pub key: String,
    /// Unix seconds at write time.
    pub stored_at: i64,
    pub dataset: Dataset,
}

impl CacheEntry {
    /// Age in seconds at `now`; clock skew never yields a negative age.
    pub fn age_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.stored_at).max(0)
    }

    /// Fresh while the age is strictly below the TTL.
    pub fn is_fresh(&self, now: i64, ttl_secs: i64) -> bool {
        self.age_secs(now) < ttl_secs
    }
}

/// Keyed persistence for fetched datasets.
pub trait CacheStore: Send + Sync {
    /// Entry for `key`, if one exists and is readable.
    fn load(&self, key: &str) -> Option<CacheEntry>;
    /// Write (or overwrite) the entry for `key`. Either the whole entry lands or nothing does.
    fn store(&self, key: &str, dataset: &Dataset, stored_at: i64) -> Result<()>;
    /// All keys currently held.
    fn keys(&self) -> Vec<String>;
}

// ------------------------------------------------------------
// Key derivation
// ------------------------------------------------------------

/// Deterministic cache key for a request.
///
/// No filters → `<prefix>_all`. Otherwise the two filter slots that matter for
/// the category are rendered by `key_segment`, absent slots as `none`:
/// `agri_<state>_<crop>`, `climate_<state>_<year>`, `prices_<crop>_<state>`.
pub fn cache_key(category: Category, filters: &Filters) -> String {
    let (a, b) = match category {
        Category::Agricultural => (filters.state.clone(), filters.crop.clone()),
        Category::Climate => (filters.state.clone(), filters.year.map(|y| y.to_string())),
        Category::MarketPrice => (filters.crop.clone(), filters.state.clone()),
    };
    if a.is_none() && b.is_none() {
        return format!("{}_all", category.key_prefix());
    }

    let slot = |v: Option<String>| v.map_or_else(|| "none".to_string(), |v| key_segment(&v));
    format!("{}_{}_{}", category.key_prefix(), slot(a), slot(b))
}

/// One filter value as a file-name-safe key segment.
///
/// Trimmed and lower-cased, spaces become `_`, and every other character
/// outside `[a-z0-9-]` is percent-encoded byte by byte (`_` included), so two
/// values that differ after lower-casing never share a segment.
fn key_segment(value: &str) -> String {
    static RE_UNSAFE: OnceCell<Regex> = OnceCell::new();
    let re = RE_UNSAFE.get_or_init(|| Regex::new(r"[^a-z0-9\-]").expect("cache key regex"));
    let lowered = value.trim().to_lowercase();
    re.replace_all(&lowered, |caps: &Captures| match &caps[0] {
        " " => "_".to_string(),
        other => other.bytes().map(|b| format!("%{b:02X}")).collect(),
    })
    .into_owned()
}

// ------------------------------------------------------------
// File-backed store
// ------------------------------------------------------------

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create the store, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating cache dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn write_atomically(path: &Path, body: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    let mut f = fs::File::create(&tmp)?;
    f.write_all(body)?;
    f.sync_all()?;
    fs::rename(tmp, path)
}

impl CacheStore for FileCache {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let body = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CacheEntry>(&body) {
            Ok(entry) if entry.schema_version == CACHE_SCHEMA_VERSION => Some(entry),
            Ok(entry) => {
                tracing::debug!(
                    target: "cache",
                    key,
                    found = entry.schema_version,
                    expected = CACHE_SCHEMA_VERSION,
                    "schema mismatch, treating as miss"
                );
                None
            }
            Err(e) => {
                tracing::debug!(target: "cache", key, error = %e, "unreadable cache entry");
                None
            }
        }
    }

    fn store(&self, key: &str, dataset: &Dataset, stored_at: i64) -> Result<()> {
        let entry = CacheEntry {
            schema_version: CACHE_SCHEMA_VERSION,
            key: key.to_string(),
            stored_at,
            dataset: dataset.clone(),
        };
        let body = serde_json::to_vec(&entry).context("serializing cache entry")?;
        let path = self.path_for(key);
        write_atomically(&path, &body)
            .with_context(|| format!("writing cache entry {}", path.display()))
    }

    fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.dir) {
            for e in entries.flatten() {
                let name = e.file_name().to_string_lossy().to_string();
                if let Some(key) = name.strip_suffix(".json") {
                    out.push(key.to_string());
                }
            }
        }
        out.sort();
        out
    }
}

// ------------------------------------------------------------
// In-memory store
// ------------------------------------------------------------

/// Process-local store with the same semantics as `FileCache`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        let g = self.entries.lock().expect("memory cache mutex poisoned");
        g.get(key).cloned()
    }

    fn store(&self, key: &str, dataset: &Dataset, stored_at: i64) -> Result<()> {
        let entry = CacheEntry {
            schema_version: CACHE_SCHEMA_VERSION,
            key: key.to_string(),
            stored_at,
            dataset: dataset.clone(),
        };
        let mut g = self.entries.lock().expect("memory cache mutex poisoned");
        g.insert(key.to_string(), entry);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let g = self.entries.lock().expect("memory cache mutex poisoned");
        let mut out: Vec<String> = g.keys().cloned().collect();
        out.sort();
        out
    }
}
