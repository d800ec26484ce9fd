// src/lib.rs
// Public library surface for the demo binary and integration tests.

pub mod assessment;
pub mod cache;
pub mod clock;
pub mod config;
pub mod dataset;
pub mod fetcher;
pub mod pipeline;
pub mod quality;

// ---- Re-exports for stable public API ----
pub use crate::assessment::QualityAssessment;
pub use crate::cache::{cache_key, CacheStore, FileCache, MemoryCache};
pub use crate::dataset::{Category, Dataset, Filters, Record};
pub use crate::fetcher::types::{FetchTier, Fetched};
pub use crate::fetcher::SourceFetcher;
pub use crate::pipeline::{DataRequirements, QualityPipeline};
pub use crate::quality::{Confidence, CrossValidationResult, QualityValidator, ValidationResult};
