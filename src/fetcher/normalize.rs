//! Portal rows → fixed-schema records.
//!
//! The portal is loose about types: numbers arrive as JSON numbers or as
//! strings, and fields are routinely absent. Every string field that is missing
//! or blank becomes the literal `"Unknown"`; numeric fields fall back to zero or
//! to a category-specific estimate.

use std::sync::Arc;

use chrono::Datelike;
use serde_json::Value;

use crate::dataset::{AgriRecord, Category, ClimateRecord, Dataset, PriceRecord, Record};
use crate::fetcher::types::{LiveRequest, RawRecord};

pub const UNKNOWN: &str = "Unknown";

pub const AGRI_LIVE_SOURCE: &str =
    "Ministry of Agriculture & Farmers Welfare - data.gov.in (Live Market Data)";
pub const CLIMATE_LIVE_SOURCE: &str = "India Meteorological Department - data.gov.in";
pub const PRICE_LIVE_SOURCE: &str = "Ministry of Agriculture & Farmers Welfare - Market Prices";

pub const MANDI_PRICES_URL: &str =
    "https://data.gov.in/resource/current-daily-price-various-commodities-various-markets-mandis";
pub const RAINFALL_URL: &str =
    "https://data.gov.in/resource/district-wise-seasonal-and-annual-rainfall";

/// Climate rows without a temperature are assumed to sit at this average.
const DEFAULT_TEMPERATURE_C: f64 = 25.0;
const DEFAULT_CLIMATE_YEAR: i32 = 2023;

/// Estimates production for rows that only report a market price.
pub trait ProductionEstimator: Send + Sync {
    fn estimate(&self, modal_price: Option<f64>) -> f64;
}

/// Placeholder heuristic: higher prices imply lower production.
/// `max(50_000, 200_000 - 50 * price)` for a positive price, otherwise 100_000.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceDerivedEstimate;

impl ProductionEstimator for PriceDerivedEstimate {
    fn estimate(&self, modal_price: Option<f64>) -> f64 {
        match modal_price {
            Some(p) if p > 0.0 => (200_000.0 - p * 50.0).max(50_000.0),
            _ => 100_000.0,
        }
    }
}

/// Builds a `Dataset` out of raw portal rows.
#[derive(Clone)]
pub struct Normalizer {
    estimator: Arc<dyn ProductionEstimator>,
    current_year: i32,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Arc::new(PriceDerivedEstimate))
    }
}

impl Normalizer {
    pub fn new(estimator: Arc<dyn ProductionEstimator>) -> Self {
        Self {
            estimator,
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Pin the year stamped on market-derived agricultural rows.
    pub fn with_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn normalize(&self, req: &LiveRequest, rows: &[RawRecord]) -> Dataset {
        match req.category {
            Category::Agricultural => Dataset::new(
                Category::Agricultural,
                AGRI_LIVE_SOURCE,
                MANDI_PRICES_URL,
                rows.iter().map(|r| self.agri(r)).collect(),
            ),
            Category::Climate => Dataset::new(
                Category::Climate,
                CLIMATE_LIVE_SOURCE,
                RAINFALL_URL,
                rows.iter().map(|r| climate(r, req.filters.year)).collect(),
            ),
            Category::MarketPrice => Dataset::new(
                Category::MarketPrice,
                PRICE_LIVE_SOURCE,
                MANDI_PRICES_URL,
                rows.iter().map(price).collect(),
            ),
        }
    }

    fn agri(&self, r: &RawRecord) -> Record {
        let price = num_field(r, "modal_price");
        let production = self.estimator.estimate(price);
        Record::Agricultural(AgriRecord {
            state: text_field(r, "state"),
            district: text_field(r, "district"),
            crop: text_field(r, "commodity"),
            production_tonnes: Some(production),
            area_hectares: Some(production / 2.0),
            year: Some(self.current_year),
            market_price: raw_text(r, "modal_price"),
            data_type: Some("market_derived".to_string()),
        })
    }
}

fn climate(r: &RawRecord, filter_year: Option<i32>) -> Record {
    Record::Climate(ClimateRecord {
        state: text_field(r, "state"),
        district: text_field(r, "district"),
        rainfall_mm: Some(num_field(r, "annual").unwrap_or(0.0)),
        temperature_avg: Some(num_field(r, "temperature").unwrap_or(DEFAULT_TEMPERATURE_C)),
        year: Some(
            int_field(r, "year")
                .or(filter_year)
                .unwrap_or(DEFAULT_CLIMATE_YEAR),
        ),
        month: "Annual".to_string(),
    })
}

fn price(r: &RawRecord) -> Record {
    Record::MarketPrice(PriceRecord {
        commodity: text_field(r, "commodity"),
        state: text_field(r, "state"),
        district: text_field(r, "district"),
        market: text_field(r, "market"),
        price_per_quintal: Some(num_field(r, "modal_price").unwrap_or(0.0)),
        date: text_field(r, "arrival_date"),
    })
}

/// Non-blank string form of a field, numbers included.
fn raw_text(r: &RawRecord, key: &str) -> Option<String> {
    let s = match r.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn text_field(r: &RawRecord, key: &str) -> String {
    raw_text(r, key).unwrap_or_else(|| UNKNOWN.to_string())
}

fn num_field(r: &RawRecord, key: &str) -> Option<f64> {
    let v = match r.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn int_field(r: &RawRecord, key: &str) -> Option<i32> {
    let v = num_field(r, key)?;
    (v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64).then_some(v as i32)
}
