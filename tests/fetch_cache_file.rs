// tests/fetch_cache_file.rs
use std::sync::Arc;

use samarth_data::clock::ManualClock;
use samarth_data::fetcher::providers::{FixtureSource, UnreachableSource};
use samarth_data::{CacheStore, Category, FetchTier, FileCache, Filters, SourceFetcher};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}")).expect("fixture")
}

#[tokio::test]
async fn file_cache_hit_is_bit_identical_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::at(1_700_000_000));

    let live = Arc::new(FixtureSource::from_fixture(&fixture("district_rainfall.json")));
    let first = SourceFetcher::new(
        live.clone(),
        Arc::new(FileCache::new(dir.path()).unwrap()),
        clock.clone(),
    );
    let filters = Filters::none().state("Punjab").year(2022);
    let a = first.fetch(Category::Climate, &filters).await;
    assert_eq!(a.tier, FetchTier::Live);
    assert!(dir.path().join("climate_punjab_2022.json").exists());

    // a fresh process reading the same directory
    clock.advance(1_200);
    let second = SourceFetcher::new(
        Arc::new(UnreachableSource::new()),
        Arc::new(FileCache::new(dir.path()).unwrap()),
        clock.clone(),
    );
    let b = second.fetch(Category::Climate, &filters).await;
    assert_eq!(b.tier, FetchTier::Cached);
    assert_eq!(b.dataset, a.dataset);
    assert_eq!(
        serde_json::to_string(&b.dataset).unwrap(),
        serde_json::to_string(&a.dataset).unwrap()
    );
    assert_eq!(live.calls(), 1);
}

#[tokio::test]
async fn expiry_falls_back_when_portal_goes_down() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::at(0));
    let cache: Arc<dyn CacheStore> = Arc::new(FileCache::new(dir.path()).unwrap());

    let up = SourceFetcher::new(
        Arc::new(FixtureSource::from_fixture(&fixture("mandi_prices.json"))),
        cache.clone(),
        clock.clone(),
    );
    let live = up.fetch(Category::Agricultural, &Filters::none()).await;
    assert_eq!(live.tier, FetchTier::Live);
    assert_eq!(live.dataset.len(), 4);

    clock.advance(3_600);
    let down = SourceFetcher::new(Arc::new(UnreachableSource::new()), cache.clone(), clock.clone());
    let after = down.fetch(Category::Agricultural, &Filters::none()).await;
    assert_eq!(after.tier, FetchTier::Fallback);
    assert!(!after.dataset.is_empty());
    assert_ne!(after.dataset, live.dataset);

    // the fallback replaced the live entry
    let entry = cache.load("agri_all").unwrap();
    assert_eq!(entry.stored_at, 3_600);
    assert_eq!(entry.dataset, after.dataset);
}

#[tokio::test]
async fn climate_expiry_falls_back_to_non_empty_seed() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::at(0));
    let cache: Arc<dyn CacheStore> = Arc::new(FileCache::new(dir.path()).unwrap());
    let filters = Filters::none().state("Punjab").year(2022);

    let up = SourceFetcher::new(
        Arc::new(FixtureSource::from_fixture(&fixture("district_rainfall.json"))),
        cache.clone(),
        clock.clone(),
    );
    let live = up.fetch(Category::Climate, &filters).await;
    assert_eq!(live.tier, FetchTier::Live);

    // still fresh one second before the hour
    clock.advance(3_599);
    let down = SourceFetcher::new(Arc::new(UnreachableSource::new()), cache.clone(), clock.clone());
    assert_eq!(down.fetch(Category::Climate, &filters).await.tier, FetchTier::Cached);

    clock.advance(1);
    let after = down.fetch(Category::Climate, &filters).await;
    assert_eq!(after.tier, FetchTier::Fallback);
    assert!(!after.dataset.is_empty());
    assert!(after.dataset.records.iter().all(|r| r.numeric("year") == Some(2022.0)));
    assert_eq!(cache.load("climate_punjab_2022").unwrap().stored_at, 3_600);
}

#[tokio::test]
async fn one_file_per_distinct_request() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = SourceFetcher::new(
        Arc::new(UnreachableSource::new()),
        Arc::new(FileCache::new(dir.path()).unwrap()),
        Arc::new(ManualClock::at(0)),
    );

    fetcher.fetch(Category::Agricultural, &Filters::none()).await;
    fetcher.fetch(Category::Agricultural, &Filters::none()).await;
    fetcher.fetch(Category::Agricultural, &Filters::none().state("Uttar Pradesh").crop("Wheat")).await;
    fetcher.fetch(Category::MarketPrice, &Filters::none().crop("Wheat")).await;
    fetcher.fetch(Category::Climate, &Filters::none().year(2021)).await;

    assert_eq!(
        fetcher.cache().keys(),
        vec![
            "agri_all".to_string(),
            "agri_uttar_pradesh_wheat".to_string(),
            "climate_none_2021".to_string(),
            "prices_wheat_none".to_string(),
        ]
    );
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn concurrent_misses_share_one_live_call() {
    let live = Arc::new(FixtureSource::from_fixture(&fixture("mandi_prices.json")));
    let fetcher = SourceFetcher::new(
        live.clone(),
        Arc::new(samarth_data::MemoryCache::new()),
        Arc::new(ManualClock::at(0)),
    );
    let filters = Filters::none();
    let (a, b) = tokio::join!(
        fetcher.fetch(Category::MarketPrice, &filters),
        fetcher.fetch(Category::MarketPrice, &filters)
    );
    assert_eq!(live.calls(), 1);
    assert_eq!(a.dataset, b.dataset);
    let mut tiers = [a.tier, b.tier];
    tiers.sort_by_key(|t| t.as_str());
    assert_eq!(tiers, [FetchTier::Cached, FetchTier::Live]);
}
