//! Runs the fetch → validate pipeline once and prints the quality report.
//!
//! `SAMARTH_STATE` / `SAMARTH_CROP` narrow the request; logs follow `RUST_LOG`.

use samarth_data::config::{load_portal_config_default, PortalConfig};
use samarth_data::{DataRequirements, Filters, QualityPipeline, QualityValidator, SourceFetcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fetcher=info,quality=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_portal_config_default().unwrap_or_else(|e| {
        tracing::warn!(error = ?e, "portal config not loaded, using defaults");
        PortalConfig::default()
    });
    let fetcher = SourceFetcher::from_config(&cfg)?;
    let validator = QualityValidator::new();

    let mut filters = Filters::none();
    if let Ok(state) = std::env::var("SAMARTH_STATE") {
        filters = filters.state(state);
    }
    if let Ok(crop) = std::env::var("SAMARTH_CROP") {
        filters = filters.crop(crop);
    }

    let out = QualityPipeline::new(&fetcher, &validator)
        .run(&DataRequirements::all(filters))
        .await;

    for f in &out.fetched {
        println!(
            "{:<13} {:<9} {:>3} records  [{}]",
            f.dataset.category.as_str(),
            f.tier.as_str(),
            f.dataset.len(),
            f.dataset.source
        );
    }
    println!();
    if let Some(report) = &out.assessment.report {
        print!("{report}");
    }
    println!("Overall confidence: {}", out.assessment.overall_confidence);
    Ok(())
}
