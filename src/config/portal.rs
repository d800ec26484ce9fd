// src/config/portal.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::dataset::Category;

pub const ENV_CONFIG_PATH: &str = "SAMARTH_PORTAL_CONFIG";
pub const ENV_API_KEY: &str = "DATA_GOV_API_KEY";

/// Public demo key published for data.gov.in.
const DEMO_API_KEY: &str = "579b464db66ec23bdd000001cdd3946e44ce4aad7209ff7b23ac571b";

fn default_base_url() -> String {
    "https://api.data.gov.in".to_string()
}
fn default_api_key() -> String {
    DEMO_API_KEY.to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("data_cache")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIds {
    #[serde(default = "ResourceIds::default_agricultural")]
    pub agricultural: String,
    #[serde(default = "ResourceIds::default_climate")]
    pub climate: String,
    #[serde(default = "ResourceIds::default_market_price")]
    pub market_price: String,
}

impl ResourceIds {
    fn default_agricultural() -> String {
        "9ef84268-d588-465a-a308-a864a43d0070".to_string()
    }
    fn default_climate() -> String {
        "88f7c9b1-4a8f-4c8e-b4e1-7c8b9a0f1e2d".to_string()
    }
    fn default_market_price() -> String {
        "9ef84268-d588-465a-a308-a864a43d0070".to_string()
    }
}

impl Default for ResourceIds {
    fn default() -> Self {
        Self {
            agricultural: Self::default_agricultural(),
            climate: Self::default_climate(),
            market_price: Self::default_market_price(),
        }
    }
}

/// Row limits sent as the `limit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "Limits::default_agri_climate")]
    pub agricultural: u32,
    #[serde(default = "Limits::default_agri_climate")]
    pub climate: u32,
    #[serde(default = "Limits::default_market_price")]
    pub market_price: u32,
}

impl Limits {
    fn default_agri_climate() -> u32 {
        100
    }
    fn default_market_price() -> u32 {
        50
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            agricultural: Self::default_agri_climate(),
            climate: Self::default_agri_climate(),
            market_price: Self::default_market_price(),
        }
    }
}

/// Open-data portal access settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// "ENV" means: read from `DATA_GOV_API_KEY`.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default)]
    pub resources: ResourceIds,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            resources: ResourceIds::default(),
            limits: Limits::default(),
            timeout_secs: default_timeout_secs(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl PortalConfig {
    pub fn resource_id(&self, category: Category) -> &str {
        match category {
            Category::Agricultural => &self.resources.agricultural,
            Category::Climate => &self.resources.climate,
            Category::MarketPrice => &self.resources.market_price,
        }
    }

    pub fn limit(&self, category: Category) -> u32 {
        match category {
            Category::Agricultural => self.limits.agricultural,
            Category::Climate => self.limits.climate,
            Category::MarketPrice => self.limits.market_price,
        }
    }

    /// Endpoint for one resource: `<base_url>/resource/<id>`.
    pub fn resource_url(&self, category: Category) -> String {
        format!(
            "{}/resource/{}",
            self.base_url.trim_end_matches('/'),
            self.resource_id(category)
        )
    }

    /// Resolve the "ENV" key placeholder and clamp out-of-range values.
    fn finish(mut self) -> Result<Self> {
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = env::var(ENV_API_KEY)
                .map_err(|_| anyhow!("Missing {ENV_API_KEY} env var"))?;
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if !(1..=60).contains(&self.timeout_secs) {
            self.timeout_secs = default_timeout_secs();
        }
        Ok(self)
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_portal_config_from(path: &Path) -> Result<PortalConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading portal config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg: PortalConfig = match ext.as_str() {
        "json" => serde_json::from_str(&content).context("parsing portal config json")?,
        _ => toml::from_str(&content).context("parsing portal config toml")?,
    };
    cfg.finish()
}

/// Load config using env var + fallbacks:
/// 1) $SAMARTH_PORTAL_CONFIG
/// 2) config/portal.toml
/// 3) config/portal.json
/// 4) built-in defaults
pub fn load_portal_config_default() -> Result<PortalConfig> {
    if let Ok(p) = env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_portal_config_from(&pb);
        }
        bail!("{ENV_CONFIG_PATH} points to non-existent path");
    }
    let toml_p = PathBuf::from("config/portal.toml");
    if toml_p.exists() {
        return load_portal_config_from(&toml_p);
    }
    let json_p = PathBuf::from("config/portal.json");
    if json_p.exists() {
        return load_portal_config_from(&json_p);
    }
    PortalConfig::default().finish()
}
