//! Fixed-list proxy source

use async_trait::async_trait;

use super::ProxySource;
use crate::error::Result;
use crate::models::Proxy;

/// A source backed by a fixed list of proxies
///
/// Useful for bootstrapping a pool from configuration, and as a
/// deterministic source in tests.
pub struct StaticSource {
    name: String,
    proxies: Vec<Proxy>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, proxies: Vec<Proxy>) -> Self {
        Self {
            name: name.into(),
            proxies,
        }
    }
}

#[async_trait]
impl ProxySource for StaticSource {
    async fn fetch_proxies(&self) -> Result<Vec<Proxy>> {
        Ok(self.proxies.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
