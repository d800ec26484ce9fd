// src/quality/mod.rs
//! Quality validator: composite score, issues and confidence band per dataset.

pub mod checks;
pub mod cross;
pub mod report;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{Category, Dataset, Record};
use crate::quality::checks::{completeness, consistency, duplicate_count, freshness, outlier_scan};

pub use crate::quality::cross::{cross_validate, CrossValidationResult};
pub use crate::quality::report::render;

pub const NO_RECORDS_ISSUE: &str = "No data records found";

/// Plausible climate ranges; values outside are reported per record.
const RAINFALL_RANGE_MM: (f64, f64) = (0.0, 5000.0);
const TEMPERATURE_RANGE_C: (f64, f64) = (5.0, 50.0);
const DEFAULT_RAINFALL_MM: f64 = 0.0;
const DEFAULT_TEMPERATURE_C: f64 = 25.0;

/// Discrete label derived from a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

// Thresholds checked top-down; the first one the score reaches wins.
const AGRI_BANDS: [(f64, Confidence); 3] = [
    (0.9, Confidence::VeryHigh),
    (0.8, Confidence::High),
    (0.7, Confidence::Medium),
];
const CLIMATE_BANDS: [(f64, Confidence); 2] = [(0.8, Confidence::High), (0.6, Confidence::Medium)];

fn band(score: f64, table: &[(f64, Confidence)]) -> Confidence {
    table
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, c)| *c)
        .unwrap_or(Confidence::Low)
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::VeryHigh => "very_high",
        }
    }

    /// 1 (low) ..= 4 (very_high).
    pub fn level(self) -> u8 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
            Confidence::VeryHigh => 4,
        }
    }

    /// Agricultural and market-price banding.
    pub fn from_agricultural_score(score: f64) -> Self {
        band(score, &AGRI_BANDS)
    }

    /// Climate banding tops out at `high`.
    pub fn from_climate_score(score: f64) -> Self {
        band(score, &CLIMATE_BANDS)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-scores behind a composite. Terms a category does not use stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityComponents {
    pub completeness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub quality_score: f64,
    pub issues: Vec<String>,
    pub confidence: Confidence,
    pub components: QualityComponents,
}

impl ValidationResult {
    fn empty() -> Self {
        Self {
            is_valid: false,
            quality_score: 0.0,
            issues: vec![NO_RECORDS_ISSUE.to_string()],
            confidence: Confidence::Low,
            components: QualityComponents::default(),
        }
    }
}

/// Weights of the agricultural-style composite. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeWeights {
    pub completeness: f64,
    pub consistency: f64,
    pub outlier: f64,
    pub freshness: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            completeness: 0.3,
            consistency: 0.3,
            outlier: 0.2,
            freshness: 0.2,
        }
    }
}

/// Stateless validator. Construct one per process and pass it by reference.
#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    weights: CompositeWeights,
}

impl QualityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: CompositeWeights) -> Self {
        Self { weights }
    }

    /// Validate against the category's required fields.
    pub fn validate(&self, dataset: &Dataset, category: Category) -> ValidationResult {
        self.validate_fields(dataset, category, category.required_fields())
    }

    /// Validate with an explicit required-field list.
    pub fn validate_fields(
        &self,
        dataset: &Dataset,
        category: Category,
        required: &[&str],
    ) -> ValidationResult {
        if dataset.is_empty() {
            tracing::debug!(target: "quality", %category, "empty dataset");
            return ValidationResult::empty();
        }
        let result = match category {
            Category::Agricultural => {
                self.composite(dataset, required, "production_tonnes", "(state, district, crop)")
            }
            Category::MarketPrice => {
                self.composite(dataset, required, "price_per_quintal", "(state, market, commodity)")
            }
            Category::Climate => climate(&dataset.records, required),
        };
        tracing::debug!(
            target: "quality",
            %category,
            records = dataset.len(),
            score = result.quality_score,
            confidence = result.confidence.as_str(),
            issues = result.issues.len(),
            "dataset validated"
        );
        result
    }

    /// Cross-source geographic alignment.
    pub fn cross_validate(&self, a: &Dataset, b: &Dataset) -> CrossValidationResult {
        cross_validate(a, b)
    }

    fn composite(
        &self,
        dataset: &Dataset,
        required: &[&str],
        numeric_field: &str,
        key_label: &str,
    ) -> ValidationResult {
        let records = &dataset.records;
        let w = &self.weights;

        let completeness = completeness(records, required);
        let consistency = consistency(records);
        let scan = outlier_scan(records, numeric_field);
        let freshness = freshness(&dataset.source);

        let score = w.completeness * completeness
            + w.consistency * consistency
            + w.outlier * scan.score
            + w.freshness * freshness;

        let mut issues = Vec::new();
        let dup = duplicate_count(records);
        if dup > 0 {
            issues.push(format!("{dup} duplicate records by {key_label}"));
        }
        for (idx, value) in &scan.flagged {
            issues.push(format!(
                "Outlier {numeric_field}: {value:?} in {}",
                records[*idx].district()
            ));
        }

        ValidationResult {
            is_valid: true,
            quality_score: score,
            issues,
            confidence: Confidence::from_agricultural_score(score),
            components: QualityComponents {
                completeness,
                consistency: Some(consistency),
                outlier: Some(scan.score),
                freshness: Some(freshness),
                data_quality: None,
            },
        }
    }
}

fn out_of(range: (f64, f64), v: f64) -> bool {
    v < range.0 || v > range.1
}

fn climate(records: &[Record], required: &[&str]) -> ValidationResult {
    let completeness = completeness(records, required);

    let mut rainfall_issues = Vec::new();
    let mut temperature_issues = Vec::new();
    for r in records {
        let rain = r.numeric("rainfall_mm").unwrap_or(DEFAULT_RAINFALL_MM);
        if out_of(RAINFALL_RANGE_MM, rain) {
            rainfall_issues.push(format!("Unusual rainfall: {rain:?}mm in {}", r.district()));
        }
        let temp = r.numeric("temperature_avg").unwrap_or(DEFAULT_TEMPERATURE_C);
        if out_of(TEMPERATURE_RANGE_C, temp) {
            temperature_issues.push(format!("Unusual temperature: {temp:?}°C in {}", r.district()));
        }
    }
    let mut issues = rainfall_issues;
    issues.append(&mut temperature_issues);

    let data_quality = (1.0 - issues.len() as f64 / records.len() as f64).max(0.0);
    let score = (completeness + data_quality) / 2.0;

    ValidationResult {
        is_valid: true,
        quality_score: score,
        issues,
        confidence: Confidence::from_climate_score(score),
        components: QualityComponents {
            completeness,
            data_quality: Some(data_quality),
            ..QualityComponents::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AgriRecord, ClimateRecord, PriceRecord};

    fn agri(district: &str, production: f64) -> Record {
        Record::Agricultural(AgriRecord {
            state: "Maharashtra".into(),
            district: district.into(),
            crop: "Rice".into(),
            production_tonnes: Some(production),
            area_hectares: None,
            year: Some(2023),
            market_price: None,
            data_type: None,
        })
    }

    fn weather(district: &str, rain: Option<f64>, temp: Option<f64>) -> Record {
        Record::Climate(ClimateRecord {
            state: "Punjab".into(),
            district: district.into(),
            rainfall_mm: rain,
            temperature_avg: temp,
            year: Some(2023),
            month: "Annual".into(),
        })
    }

    fn ds(category: Category, source: &str, records: Vec<Record>) -> Dataset {
        Dataset::new(category, source, "https://example.invalid", records)
    }

    #[test]
    fn banding_tables_are_asymmetric() {
        assert_eq!(Confidence::from_agricultural_score(0.9), Confidence::VeryHigh);
        assert_eq!(Confidence::from_agricultural_score(0.8999), Confidence::High);
        assert_eq!(Confidence::from_agricultural_score(0.8), Confidence::High);
        assert_eq!(Confidence::from_agricultural_score(0.7), Confidence::Medium);
        assert_eq!(Confidence::from_agricultural_score(0.6999), Confidence::Low);

        assert_eq!(Confidence::from_climate_score(1.0), Confidence::High);
        assert_eq!(Confidence::from_climate_score(0.8), Confidence::High);
        assert_eq!(Confidence::from_climate_score(0.7999), Confidence::Medium);
        assert_eq!(Confidence::from_climate_score(0.6), Confidence::Medium);
        assert_eq!(Confidence::from_climate_score(0.5999), Confidence::Low);
    }

    #[test]
    fn confidence_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Confidence::VeryHigh).unwrap(), "\"very_high\"");
        assert_eq!(Confidence::VeryHigh.to_string(), "very_high");
    }

    #[test]
    fn empty_dataset_is_invalid_with_zero_score() {
        let v = QualityValidator::new();
        for c in Category::ALL {
            let r = v.validate(&ds(c, "Live", vec![]), c);
            assert!(!r.is_valid);
            assert_eq!(r.quality_score, 0.0);
            assert_eq!(r.issues, vec![NO_RECORDS_ISSUE.to_string()]);
        }
    }

    #[test]
    fn duplicate_pair_scores_point_seven_one() {
        let r = QualityValidator::new().validate(
            &ds(Category::Agricultural, "State agriculture board", vec![agri("Pune", 125_000.0), agri("Pune", 125_000.0)]),
            Category::Agricultural,
        );
        assert!(r.is_valid);
        assert!((r.quality_score - 0.71).abs() < 1e-9);
        assert_eq!(r.confidence, Confidence::Medium);
        assert_eq!(r.components.consistency, Some(0.5));
        assert_eq!(r.components.outlier, Some(1.0));
        assert_eq!(r.components.freshness, Some(0.8));
        assert_eq!(r.issues.len(), 1);
        assert!(r.issues[0].starts_with("1 duplicate"));
    }

    #[test]
    fn outliers_are_listed_but_keep_dataset_valid() {
        let mut records: Vec<Record> = (0..10).map(|i| agri(&format!("D{i}"), 100.0)).collect();
        records.push(agri("Nagpur", 500.0));
        let r = QualityValidator::new().validate(&ds(Category::Agricultural, "Live feed", records), Category::Agricultural);
        assert!(r.is_valid);
        assert!(r.issues.contains(&"Outlier production_tonnes: 500.0 in Nagpur".to_string()));
        assert_eq!(r.components.freshness, Some(1.0));
    }

    #[test]
    fn custom_weights_apply() {
        let v = QualityValidator::with_weights(CompositeWeights {
            completeness: 0.0,
            consistency: 1.0,
            outlier: 0.0,
            freshness: 0.0,
        });
        let r = v.validate(
            &ds(Category::Agricultural, "x", vec![agri("Pune", 1.0), agri("Pune", 1.0)]),
            Category::Agricultural,
        );
        assert!((r.quality_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn climate_issues_list_rainfall_before_temperature() {
        let records = vec![
            weather("Hot", Some(700.0), Some(51.0)),
            weather("Wet", Some(6000.0), Some(20.0)),
            weather("Cold", Some(-1.0), Some(4.0)),
            weather("Fine", Some(800.0), Some(25.0)),
        ];
        let r = QualityValidator::new().validate(&ds(Category::Climate, "IMD", records), Category::Climate);
        assert_eq!(
            r.issues,
            vec![
                "Unusual rainfall: 6000.0mm in Wet".to_string(),
                "Unusual rainfall: -1.0mm in Cold".to_string(),
                "Unusual temperature: 51.0°C in Hot".to_string(),
                "Unusual temperature: 4.0°C in Cold".to_string(),
            ]
        );
        // four issues over four records
        assert_eq!(r.components.data_quality, Some(0.0));
        assert!((r.quality_score - 0.5).abs() < 1e-12);
        assert_eq!(r.confidence, Confidence::Low);
    }

    #[test]
    fn climate_data_quality_never_negative() {
        let r = QualityValidator::new().validate(
            &ds(Category::Climate, "IMD", vec![weather("X", Some(9999.0), Some(99.0))]),
            Category::Climate,
        );
        assert_eq!(r.issues.len(), 2);
        assert_eq!(r.components.data_quality, Some(0.0));
    }

    #[test]
    fn missing_climate_values_use_defaults_but_cost_completeness() {
        let r = QualityValidator::new().validate(
            &ds(Category::Climate, "IMD", vec![weather("Pune", None, None)]),
            Category::Climate,
        );
        assert!(r.issues.is_empty());
        assert_eq!(r.components.data_quality, Some(1.0));
        assert!(r.components.completeness < 1.0);
    }

    #[test]
    fn market_prices_use_agricultural_scheme() {
        let price = |market: &str, p: f64| {
            Record::MarketPrice(PriceRecord {
                commodity: "Onion".into(),
                state: "Maharashtra".into(),
                district: "Nashik".into(),
                market: market.into(),
                price_per_quintal: Some(p),
                date: "2023-12-01".into(),
            })
        };
        let r = QualityValidator::new().validate(
            &ds(
                Category::MarketPrice,
                "Market Prices (Sample)",
                vec![price("Lasalgaon", 1800.0), price("Pimpalgaon", 1750.0), price("Lasalgaon", 1900.0)],
            ),
            Category::MarketPrice,
        );
        assert!(r.is_valid);
        assert!((r.components.consistency.unwrap() - (1.0 - 1.0 / 3.0)).abs() < 1e-12);
        assert_eq!(r.components.freshness, Some(0.7));
        assert!(r.issues[0].contains("(state, market, commodity)"));
    }
}
