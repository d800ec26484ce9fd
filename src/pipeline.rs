// src/pipeline.rs
//! Fetch → validate → assess for one request.

use serde::{Deserialize, Serialize};

use crate::assessment::QualityAssessment;
use crate::dataset::{Category, Filters};
use crate::fetcher::types::{FetchTier, Fetched};
use crate::fetcher::SourceFetcher;
use crate::quality::QualityValidator;

/// Which categories a request needs, and with which filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRequirements {
    pub agricultural: bool,
    pub climate: bool,
    pub market_price: bool,
    #[serde(default)]
    pub filters: Filters,
}

impl DataRequirements {
    pub fn all(filters: Filters) -> Self {
        Self {
            agricultural: true,
            climate: true,
            market_price: true,
            filters,
        }
    }

    pub fn wants(&self, category: Category) -> bool {
        match category {
            Category::Agricultural => self.agricultural,
            Category::Climate => self.climate,
            Category::MarketPrice => self.market_price,
        }
    }
}

/// Outcome of one run: the fetched datasets plus their assessment.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub fetched: Vec<Fetched>,
    pub assessment: QualityAssessment,
}

impl PipelineOutput {
    pub fn dataset(&self, category: Category) -> Option<&Fetched> {
        self.fetched.iter().find(|f| f.dataset.category == category)
    }

    pub fn tier(&self, category: Category) -> Option<FetchTier> {
        self.dataset(category).map(|f| f.tier)
    }
}

pub struct QualityPipeline<'a> {
    fetcher: &'a SourceFetcher,
    validator: &'a QualityValidator,
}

impl<'a> QualityPipeline<'a> {
    pub fn new(fetcher: &'a SourceFetcher, validator: &'a QualityValidator) -> Self {
        Self { fetcher, validator }
    }

    /// Fetch each requested category in turn and assess it. Never fails.
    pub async fn run(&self, req: &DataRequirements) -> PipelineOutput {
        let mut fetched = Vec::new();
        for category in Category::ALL {
            if req.wants(category) {
                fetched.push(self.fetcher.fetch(category, &req.filters).await);
            }
        }

        let find = |c: Category| fetched.iter().find(|f| f.dataset.category == c);
        let validate = |c: Category| find(c).map(|f| self.validator.validate(&f.dataset, c));

        let agricultural = validate(Category::Agricultural);
        let climate = validate(Category::Climate);
        let market_price = validate(Category::MarketPrice);
        let cross = match (find(Category::Agricultural), find(Category::Climate)) {
            (Some(a), Some(c)) => Some(self.validator.cross_validate(&a.dataset, &c.dataset)),
            _ => None,
        };

        let assessment = QualityAssessment::assemble(agricultural, climate, market_price, cross);
        tracing::info!(
            target: "quality",
            datasets = fetched.len(),
            overall = assessment.overall_confidence.as_str(),
            "assessment ready"
        );
        PipelineOutput { fetched, assessment }
    }
}
