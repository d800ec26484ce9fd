//! Geographic alignment between two datasets (Jaccard index over states).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

pub const STRONG_OVERLAP: &str = "Strong geographic overlap enables meaningful correlation analysis";
pub const LIMITED_OVERLAP: &str = "Limited geographic overlap - consider broader data sources";

/// Alignment above this (strictly) counts as a usable correlation.
const CORRELATION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationResult {
    pub correlation_found: bool,
    pub geographic_alignment: f64,
    pub recommendations: Vec<String>,
}

fn states(ds: &Dataset) -> BTreeSet<String> {
    ds.records.iter().map(|r| r.state().to_lowercase()).collect()
}

pub fn cross_validate(a: &Dataset, b: &Dataset) -> CrossValidationResult {
    if a.is_empty() || b.is_empty() {
        return CrossValidationResult::default();
    }
    let (sa, sb) = (states(a), states(b));
    let union = sa.union(&sb).count();
    let alignment = if union == 0 {
        0.0
    } else {
        sa.intersection(&sb).count() as f64 / union as f64
    };

    let correlation_found = alignment > CORRELATION_THRESHOLD;
    let rec = if correlation_found { STRONG_OVERLAP } else { LIMITED_OVERLAP };
    tracing::debug!(target: "quality", alignment, correlation_found, "cross validated");
    CrossValidationResult {
        correlation_found,
        geographic_alignment: alignment,
        recommendations: vec![rec.to_string()],
    }
}
