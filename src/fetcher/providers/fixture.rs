// src/fetcher/providers/fixture.rs
//! Offline live sources: a canned portal body and an always-down endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::portal::parse_portal_body;
use crate::fetcher::types::{LiveRequest, LiveSource, RawRecord};

/// Serves the same portal body for every request and counts calls.
pub struct FixtureSource {
    body: String,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn from_fixture(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveSource for FixtureSource {
    async fn fetch_records(&self, _req: &LiveRequest) -> Result<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_portal_body(&self.body)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Fails every request, as a portal outage would.
#[derive(Default)]
pub struct UnreachableSource {
    calls: AtomicUsize,
}

impl UnreachableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveSource for UnreachableSource {
    async fn fetch_records(&self, req: &LiveRequest) -> Result<Vec<RawRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bail!("portal unreachable for {}", req.category)
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}
