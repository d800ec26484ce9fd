use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde_json::Value;

use crate::config::PortalConfig;
use crate::dataset::Category;
use crate::fetcher::types::{LiveRequest, LiveSource, RawRecord};

/// Extract the record array from a portal response body.
///
/// The portal answers with either `{"records": [...]}` or `{"data": [...]}`.
/// A body with neither key yields no records; a body that is not a JSON object,
/// or whose record key is not an array, is an error. Non-object rows are skipped.
pub fn parse_portal_body(body: &str) -> Result<Vec<RawRecord>> {
    let v: Value = serde_json::from_str(body).context("parsing portal json body")?;
    let obj = match v {
        Value::Object(m) => m,
        _ => bail!("portal body is not a json object"),
    };
    let rows = match obj.get("records").or_else(|| obj.get("data")) {
        None => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(_) => bail!("portal records field is not an array"),
    };
    Ok(rows
        .iter()
        .filter_map(|r| r.as_object().cloned())
        .collect())
}

/// HTTP client for the data.gov.in resource API.
pub struct PortalClient {
    http: reqwest::Client,
    config: PortalConfig,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("samarth-data/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4u64.min(config.timeout_secs)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building portal http client")?;
        Ok(Self { http, config })
    }

    /// Query parameters for a request. Only the climate resource accepts filters.
    pub fn query_params(&self, req: &LiveRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("api-key".to_string(), self.config.api_key.clone()),
            ("format".to_string(), "json".to_string()),
            ("limit".to_string(), self.config.limit(req.category).to_string()),
        ];
        if req.category == Category::Climate {
            if let Some(state) = &req.filters.state {
                params.push(("filters[state]".to_string(), state.clone()));
            }
            if let Some(year) = req.filters.year {
                params.push(("filters[year]".to_string(), year.to_string()));
            }
        }
        params
    }
}

#[async_trait]
impl LiveSource for PortalClient {
    async fn fetch_records(&self, req: &LiveRequest) -> Result<Vec<RawRecord>> {
        let t0 = Instant::now();
        let url = self.config.resource_url(req.category);

        let resp = self
            .http
            .get(&url)
            .query(&self.query_params(req))
            .send()
            .await
            .context("portal http get()")?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            bail!("portal returned HTTP {status} for {}", req.category);
        }
        let body = resp.text().await.context("portal http .text()")?;
        let rows = parse_portal_body(&body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_live_ms").record(ms);
        tracing::debug!(target: "fetcher", category = %req.category, rows = rows.len(), ms, "portal fetch ok");
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "data.gov.in"
    }
}
