// src/fetcher/seed.rs
//! Built-in fallback datasets served when the portal cannot be reached.

use crate::dataset::{AgriRecord, Category, ClimateRecord, Dataset, Filters, PriceRecord, Record};
use crate::fetcher::normalize::{MANDI_PRICES_URL, RAINFALL_URL};

pub const AGRI_SEED_SOURCE: &str = "Ministry of Agriculture & Farmers Welfare (Sample Data)";
pub const CLIMATE_SEED_SOURCE: &str = "India Meteorological Department (Sample Data)";
pub const PRICE_SEED_SOURCE: &str = "Ministry of Agriculture & Farmers Welfare - Market Prices (Sample)";

const CROP_PRODUCTION_URL: &str = "https://data.gov.in/resource/crop-production-statistics";
const SEED_YEAR: i32 = 2023;

/// Fallback dataset for a category. Never empty.
pub fn seed_dataset(category: Category, filters: &Filters) -> Dataset {
    match category {
        Category::Agricultural => agri_seed(),
        Category::Climate => climate_seed(filters.year.unwrap_or(SEED_YEAR)),
        Category::MarketPrice => price_seed(filters),
    }
}

fn agri_seed() -> Dataset {
    let rows = [
        ("Maharashtra", "Pune", "Rice", 125_000.0, 50_000.0, "2800"),
        ("Maharashtra", "Nashik", "Rice", 98_000.0, 40_000.0, "2850"),
        ("Punjab", "Ludhiana", "Rice", 280_000.0, 80_000.0, "2750"),
        ("Punjab", "Amritsar", "Wheat", 320_000.0, 90_000.0, "2200"),
        ("Punjab", "Ludhiana", "Wheat", 350_000.0, 95_000.0, "2180"),
        ("Uttar Pradesh", "Lucknow", "Wheat", 180_000.0, 60_000.0, "2250"),
        ("Haryana", "Gurgaon", "Wheat", 150_000.0, 55_000.0, "2220"),
    ];
    let records = rows
        .iter()
        .map(|&(state, district, crop, production, area, price)| {
            Record::Agricultural(AgriRecord {
                state: state.to_string(),
                district: district.to_string(),
                crop: crop.to_string(),
                production_tonnes: Some(production),
                area_hectares: Some(area),
                year: Some(SEED_YEAR),
                market_price: Some(price.to_string()),
                data_type: None,
            })
        })
        .collect();
    Dataset::new(Category::Agricultural, AGRI_SEED_SOURCE, CROP_PRODUCTION_URL, records)
}

fn climate_seed(year: i32) -> Dataset {
    let rows = [
        ("Maharashtra", "Pune", 722.0, 24.5),
        ("Maharashtra", "Mumbai", 2167.0, 27.2),
        ("Maharashtra", "Nashik", 508.0, 25.8),
        ("Punjab", "Ludhiana", 709.0, 23.8),
        ("Punjab", "Amritsar", 632.0, 24.1),
        ("Uttar Pradesh", "Lucknow", 896.0, 25.4),
        ("Haryana", "Gurgaon", 553.0, 25.2),
    ];
    let records = rows
        .iter()
        .map(|&(state, district, rainfall, temperature)| {
            Record::Climate(ClimateRecord {
                state: state.to_string(),
                district: district.to_string(),
                rainfall_mm: Some(rainfall),
                temperature_avg: Some(temperature),
                year: Some(year),
                month: "Annual".to_string(),
            })
        })
        .collect();
    Dataset::new(Category::Climate, CLIMATE_SEED_SOURCE, RAINFALL_URL, records)
}

fn price_seed(filters: &Filters) -> Dataset {
    let record = Record::MarketPrice(PriceRecord {
        commodity: filters.crop.clone().unwrap_or_else(|| "Rice".to_string()),
        state: filters.state.clone().unwrap_or_else(|| "Maharashtra".to_string()),
        district: "Pune".to_string(),
        market: "Pune Mandi".to_string(),
        price_per_quintal: Some(2850.0),
        date: "2023-12-01".to_string(),
    });
    Dataset::new(Category::MarketPrice, PRICE_SEED_SOURCE, MANDI_PRICES_URL, vec![record])
}
