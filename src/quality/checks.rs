//! Sub-scores that feed the composite quality score.
//!
//! Each check is a pure function over records and returns a value in `[0, 1]`.
//! - `completeness`: share of required values that are present
//! - `consistency` : 1 − duplicate share, by identity key
//! - `outlier_scan`: 1 − share of 3-sigma outliers among positive values
//! - `freshness`   : inferred from the source label only

use std::collections::HashSet;

use crate::dataset::Record;

/// Present (non-null, non-empty) required values over `records × required`.
pub fn completeness(records: &[Record], required: &[&str]) -> f64 {
    let total = records.len() * required.len();
    if total == 0 {
        return 0.0;
    }
    let present = records
        .iter()
        .flat_map(|r| required.iter().map(move |f| r.field(f)))
        .filter(|v| v.is_present())
        .count();
    present as f64 / total as f64
}

/// Records whose identity key already appeared earlier in iteration order.
/// The first occurrence of a key is never a duplicate.
pub fn duplicate_count(records: &[Record]) -> usize {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert(r.identity_key()))
        .count()
}

/// `1 − duplicates / records`, or 1.0 with fewer than two records.
pub fn consistency(records: &[Record]) -> f64 {
    if records.len() < 2 {
        return 1.0;
    }
    let dup = duplicate_count(records);
    (1.0 - dup as f64 / records.len() as f64).max(0.0)
}

/// Mean and sample standard deviation (n − 1). `None` below two values.
pub fn mean_and_sample_sd(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((mean, (ss / (n - 1.0)).sqrt()))
}

/// Result of the 3-sigma scan over one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierScan {
    pub score: f64,
    /// Values that were sampled (positive, finite).
    pub sampled: usize,
    /// `(record index, value)` for every flagged value.
    pub flagged: Vec<(usize, f64)>,
}

/// 3-sigma outlier detection on a numeric field.
///
/// Only positive, finite values are sampled; missing, zero, negative or
/// non-numeric values are left out of the sample entirely. With fewer than
/// three samples, or an undefined/zero deviation, nothing is flagged and the
/// score is 1.0. A value is flagged when `|v − mean| > 3σ` (strictly).
pub fn outlier_scan(records: &[Record], field: &str) -> OutlierScan {
    let sample: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.numeric(field).map(|v| (i, v)))
        .filter(|(_, v)| v.is_finite() && *v > 0.0)
        .collect();

    let clean = OutlierScan {
        score: 1.0,
        sampled: sample.len(),
        flagged: Vec::new(),
    };
    if sample.len() < 3 {
        return clean;
    }
    let values: Vec<f64> = sample.iter().map(|(_, v)| *v).collect();
    let Some((mean, sd)) = mean_and_sample_sd(&values) else {
        return clean;
    };
    if !sd.is_finite() || sd == 0.0 {
        return clean;
    }

    let flagged: Vec<(usize, f64)> = sample
        .into_iter()
        .filter(|(_, v)| (v - mean).abs() > 3.0 * sd)
        .collect();
    let score = (1.0 - flagged.len() as f64 / values.len() as f64).max(0.0);
    OutlierScan {
        score,
        sampled: values.len(),
        flagged,
    }
}

/// Freshness from the provider label: live/real-time 1.0, sample 0.7, else 0.8.
pub fn freshness(source: &str) -> f64 {
    let s = source.to_lowercase();
    if s.contains("live") || s.contains("real-time") {
        1.0
    } else if s.contains("sample") {
        0.7
    } else {
        0.8
    }
}
