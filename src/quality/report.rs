//! Human-readable quality summary. Formatting only.

use std::fmt::Write as _;

use crate::quality::{CrossValidationResult, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    High,
    Moderate,
    Low,
}

impl Verdict {
    /// Band the unweighted mean of the two composite scores.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 0.8 {
            Verdict::High
        } else if mean >= 0.6 {
            Verdict::Moderate
        } else {
            Verdict::Low
        }
    }

    pub fn sentence(self) -> &'static str {
        match self {
            Verdict::High => "High quality data suitable for analysis",
            Verdict::Moderate => "Moderate quality, results should be interpreted carefully",
            Verdict::Low => "Low quality data, results may be unreliable",
        }
    }
}

fn pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

fn section(out: &mut String, title: &str, result: Option<&ValidationResult>) {
    let (score, conf) = match result {
        Some(r) => (r.quality_score, r.confidence.as_str()),
        None => (0.0, "unknown"),
    };
    let _ = writeln!(out, "**{title}**: {} quality, {conf} confidence", pct(score));
    if let Some(r) = result.filter(|r| !r.issues.is_empty()) {
        let _ = writeln!(out, "   Issues: {} detected", r.issues.len());
    }
}

/// Render the assessment. A missing result reads as 0% / unknown and counts
/// as zero in the overall mean; a missing cross result reads as 0% overlap.
pub fn render(
    agricultural: Option<&ValidationResult>,
    climate: Option<&ValidationResult>,
    cross: Option<&CrossValidationResult>,
) -> String {
    let mut out = String::from("**Data Quality Assessment**\n\n");
    section(&mut out, "Agricultural Data", agricultural);
    section(&mut out, "Climate Data", climate);
    let alignment = cross.map_or(0.0, |c| c.geographic_alignment);
    let _ = writeln!(out, "**Geographic Alignment**: {} overlap between sources", pct(alignment));

    let score = |r: Option<&ValidationResult>| r.map_or(0.0, |r| r.quality_score);
    let mean = (score(agricultural) + score(climate)) / 2.0;
    let _ = writeln!(out, "\n**Overall Assessment**: {}", Verdict::from_mean(mean).sentence());
    out
}
