// tests/config_loading.rs
use samarth_data::config::portal::{ENV_API_KEY, ENV_CONFIG_PATH};
use samarth_data::config::{load_portal_config_default, load_portal_config_from, PortalConfig};
use samarth_data::Category;
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("portal.toml");
    fs::write(
        &p_toml,
        r#"
base_url = "http://127.0.0.1:8088"
timeout_secs = 5
cache_dir = "/tmp/samarth"

[resources]
climate = "rain-1"

[limits]
market_price = 10
"#,
    )
    .unwrap();
    let cfg = load_portal_config_from(&p_toml).unwrap();
    assert_eq!(cfg.timeout_secs, 5);
    assert_eq!(cfg.limit(Category::MarketPrice), 10);
    assert_eq!(cfg.resource_url(Category::Climate), "http://127.0.0.1:8088/resource/rain-1");

    let p_json = dir.path().join("portal.json");
    fs::write(&p_json, r#"{"timeout_secs": 600, "limits": {"agricultural": 7}}"#).unwrap();
    let cj = load_portal_config_from(&p_json).unwrap();
    assert_eq!(cj.timeout_secs, 10);
    assert_eq!(cj.limit(Category::Agricultural), 7);
    assert_eq!(cj.base_url, PortalConfig::default().base_url);

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(load_portal_config_from(&broken).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Run in an empty CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) nothing on disk → defaults
    assert_eq!(load_portal_config_default().unwrap(), PortalConfig::default());

    // 2) JSON fallback, then TOML wins over JSON
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("portal.json"), r#"{"timeout_secs": 3}"#).unwrap();
    assert_eq!(load_portal_config_default().unwrap().timeout_secs, 3);
    fs::write(cfg_dir.join("portal.toml"), "timeout_secs = 4").unwrap();
    assert_eq!(load_portal_config_default().unwrap().timeout_secs, 4);

    // 3) env path has priority
    let p_env = tmp.path().join("elsewhere.toml");
    fs::write(&p_env, "timeout_secs = 8").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_portal_config_default().unwrap().timeout_secs, 8);

    // 4) env pointing nowhere is an error, not a silent default
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_portal_config_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn api_key_from_env_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("portal.toml");
    fs::write(&p, r#"api_key = "ENV""#).unwrap();

    env::set_var(ENV_API_KEY, "secret-key");
    assert_eq!(load_portal_config_from(&p).unwrap().api_key, "secret-key");

    env::remove_var(ENV_API_KEY);
    assert!(load_portal_config_from(&p).is_err());
}
