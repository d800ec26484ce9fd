// src/assessment.rs
//! Per-request bundle of validation results plus the rendered report.

use serde::Serialize;

use crate::quality::{render, Confidence, CrossValidationResult, ValidationResult};

#[derive(Debug, Clone, Serialize)]
pub struct QualityAssessment {
    pub agricultural: Option<ValidationResult>,
    pub climate: Option<ValidationResult>,
    pub market_price: Option<ValidationResult>,
    pub cross: Option<CrossValidationResult>,
    /// `None` when nothing was validated.
    pub report: Option<String>,
    pub overall_confidence: Confidence,
}

impl QualityAssessment {
    /// Assemble from individual results. The report is rendered when the
    /// agricultural or climate side was validated; prices alone get none.
    pub fn assemble(
        agricultural: Option<ValidationResult>,
        climate: Option<ValidationResult>,
        market_price: Option<ValidationResult>,
        cross: Option<CrossValidationResult>,
    ) -> Self {
        let reportable = agricultural.is_some() || climate.is_some();
        let report = reportable.then(|| render(agricultural.as_ref(), climate.as_ref(), cross.as_ref()));
        let overall_confidence = overall_confidence(
            agricultural.as_ref().map(|r| r.confidence),
            climate.as_ref().map(|r| r.confidence),
        );
        Self {
            agricultural,
            climate,
            market_price,
            cross,
            report,
            overall_confidence,
        }
    }
}

/// Average the agricultural and climate levels; a missing side counts as medium.
pub fn overall_confidence(agricultural: Option<Confidence>, climate: Option<Confidence>) -> Confidence {
    let level = |c: Option<Confidence>| f64::from(c.unwrap_or(Confidence::Medium).level());
    let avg = (level(agricultural) + level(climate)) / 2.0;
    if avg >= 3.5 {
        Confidence::VeryHigh
    } else if avg >= 2.5 {
        Confidence::High
    } else if avg >= 1.5 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityComponents;
    use crate::quality::Confidence::*;

    #[test]
    fn overall_rounds_half_levels_up() {
        assert_eq!(overall_confidence(Some(VeryHigh), Some(High)), VeryHigh);
        assert_eq!(overall_confidence(Some(High), Some(Medium)), High);
        assert_eq!(overall_confidence(Some(Medium), Some(Low)), Medium);
        assert_eq!(overall_confidence(Some(Low), Some(Low)), Low);
        assert_eq!(overall_confidence(None, None), Medium);
        assert_eq!(overall_confidence(Some(VeryHigh), None), High);
    }

    #[test]
    fn report_needs_agricultural_or_climate() {
        let empty = QualityAssessment::assemble(None, None, None, None);
        assert!(empty.report.is_none());
        assert_eq!(empty.overall_confidence, Medium);

        let price = ValidationResult {
            is_valid: true,
            quality_score: 0.9,
            issues: vec![],
            confidence: VeryHigh,
            components: QualityComponents::default(),
        };
        let prices_only = QualityAssessment::assemble(None, None, Some(price.clone()), None);
        assert!(prices_only.report.is_none());

        let with_agri = QualityAssessment::assemble(Some(price.clone()), None, Some(price), None);
        let report = with_agri.report.unwrap();
        assert!(report.starts_with("**Data Quality Assessment**"));
        assert!(report.contains("**Geographic Alignment**: 0.0% overlap between sources"));
    }
}
