// src/fetcher/types.rs
use anyhow::Result;
use serde::Serialize;

use crate::dataset::{Category, Dataset, Filters};

/// One record exactly as the portal returned it.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// What a live source is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRequest {
    pub category: Category,
    pub filters: Filters,
}

#[async_trait::async_trait]
pub trait LiveSource: Send + Sync {
    /// Raw records for the request. Any network, status or parse problem is an `Err`.
    async fn fetch_records(&self, req: &LiveRequest) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}

/// Which tier served a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTier {
    Cached,
    Live,
    Fallback,
}

impl FetchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchTier::Cached => "cached",
            FetchTier::Live => "live",
            FetchTier::Fallback => "fallback",
        }
    }
}

/// A dataset plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub tier: FetchTier,
    pub key: String,
    pub dataset: Dataset,
}
