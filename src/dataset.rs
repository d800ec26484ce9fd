//! # Datasets
//!
//! Fixed-schema records for the three data categories served by the portal,
//! plus the provenance-tagged `Dataset` that carries them between the fetcher,
//! the cache and the validator.
//!
//! Records are plain structs with explicit optional fields; the only dynamic
//! access is `Record::field`, used by completeness scoring to look up the
//! category's required fields by name.

use serde::{Deserialize, Serialize};

/// Cache lifetime for agricultural and climate datasets.
pub const AGRI_CLIMATE_TTL_SECS: i64 = 3600;
/// Cache lifetime for market prices.
pub const MARKET_PRICE_TTL_SECS: i64 = 1800;

/// Data category requested from the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Agricultural,
    Climate,
    MarketPrice,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Agricultural,
        Category::Climate,
        Category::MarketPrice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Agricultural => "agricultural",
            Category::Climate => "climate",
            Category::MarketPrice => "market_price",
        }
    }

    /// Prefix used for cache keys (`agri_all`, `climate_punjab_2023`, ...).
    pub fn key_prefix(self) -> &'static str {
        match self {
            Category::Agricultural => "agri",
            Category::Climate => "climate",
            Category::MarketPrice => "prices",
        }
    }

    /// How long a cached dataset of this category may be served.
    pub fn ttl_secs(self) -> i64 {
        match self {
            Category::Agricultural | Category::Climate => AGRI_CLIMATE_TTL_SECS,
            Category::MarketPrice => MARKET_PRICE_TTL_SECS,
        }
    }

    /// Fields that must be present for a record to count as complete.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Category::Agricultural => &["state", "district", "crop", "production_tonnes"],
            Category::Climate => &["state", "district", "rainfall_mm", "temperature_avg"],
            Category::MarketPrice => &["commodity", "state", "market", "price_per_quintal"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional request filters. Which of them matter depends on the category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Filters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.crop.is_none() && self.year.is_none()
    }
}

/// Crop production row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgriRecord {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub crop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_tonnes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_hectares: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Modal mandi price as reported (string-encoded number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price: Option<String>,
    /// Set when production was estimated rather than reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// Rainfall/temperature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: String,
}

/// Mandi price row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub commodity: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub market: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_quintal: Option<f64>,
    #[serde(default)]
    pub date: String,
}

/// One row of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Agricultural(AgriRecord),
    Climate(ClimateRecord),
    MarketPrice(PriceRecord),
}

/// Value of a named field, as seen by completeness scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
}

impl FieldValue<'_> {
    /// Non-null and not an empty string.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(_) => true,
        }
    }
}

fn text(s: &str) -> FieldValue<'_> {
    FieldValue::Text(s)
}

fn number(v: Option<f64>) -> FieldValue<'static> {
    v.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
}

fn year(v: Option<i32>) -> FieldValue<'static> {
    number(v.map(f64::from))
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Record::Agricultural(_) => Category::Agricultural,
            Record::Climate(_) => Category::Climate,
            Record::MarketPrice(_) => Category::MarketPrice,
        }
    }

    pub fn state(&self) -> &str {
        match self {
            Record::Agricultural(r) => &r.state,
            Record::Climate(r) => &r.state,
            Record::MarketPrice(r) => &r.state,
        }
    }

    pub fn district(&self) -> &str {
        match self {
            Record::Agricultural(r) => &r.district,
            Record::Climate(r) => &r.district,
            Record::MarketPrice(r) => &r.district,
        }
    }

    /// Triple used for duplicate detection.
    /// Agricultural: (state, district, crop); market price: (state, market, commodity).
    /// Climate validation never counts duplicates; the climate triple
    /// (state, district, month) applies only when climate rows go through
    /// `duplicate_count` directly or are validated under another category.
    pub fn identity_key(&self) -> (&str, &str, &str) {
        match self {
            Record::Agricultural(r) => (&r.state, &r.district, &r.crop),
            Record::Climate(r) => (&r.state, &r.district, &r.month),
            Record::MarketPrice(r) => (&r.state, &r.market, &r.commodity),
        }
    }

    /// Look up a field by its serialized name. Unknown names are `Missing`.
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        match self {
            Record::Agricultural(r) => match name {
                "state" => text(&r.state),
                "district" => text(&r.district),
                "crop" => text(&r.crop),
                "production_tonnes" => number(r.production_tonnes),
                "area_hectares" => number(r.area_hectares),
                "year" => year(r.year),
                "market_price" => r.market_price.as_deref().map(text).unwrap_or(FieldValue::Missing),
                "data_type" => r.data_type.as_deref().map(text).unwrap_or(FieldValue::Missing),
                _ => FieldValue::Missing,
            },
            Record::Climate(r) => match name {
                "state" => text(&r.state),
                "district" => text(&r.district),
                "rainfall_mm" => number(r.rainfall_mm),
                "temperature_avg" => number(r.temperature_avg),
                "year" => year(r.year),
                "month" => text(&r.month),
                _ => FieldValue::Missing,
            },
            Record::MarketPrice(r) => match name {
                "commodity" => text(&r.commodity),
                "state" => text(&r.state),
                "district" => text(&r.district),
                "market" => text(&r.market),
                "price_per_quintal" => number(r.price_per_quintal),
                "date" => text(&r.date),
                _ => FieldValue::Missing,
            },
        }
    }

    /// Numeric value of a field, if it holds one.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match self.field(name) {
            FieldValue::Number(v) => Some(v),
            _ => None,
        }
    }
}

/// A provenance-tagged collection of records from one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub category: Category,
    /// Human-readable provider label; freshness is inferred from it.
    pub source: String,
    #[serde(rename = "url")]
    pub origin_url: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(
        category: Category,
        source: impl Into<String>,
        origin_url: impl Into<String>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            category,
            source: source.into(),
            origin_url: origin_url.into(),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
