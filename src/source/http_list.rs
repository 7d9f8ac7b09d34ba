//! Plaintext proxy-list source
//!
//! Fetches a `host:port`-per-line list (the format served by most free
//! proxy list endpoints) and tags every entry with a fixed protocol.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::ProxySource;
use crate::error::{CarouselError, Result};
use crate::models::Proxy;

/// A source that downloads a plaintext `host:port` list over HTTP
pub struct HttpListSource {
    name: String,
    url: String,
    protocol: String,
    client: Client,
}

impl HttpListSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        protocol: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name: name.into(),
            url: url.into(),
            protocol: protocol.into().to_lowercase(),
            client,
        })
    }

    /// Parse one `host:port` line; None for blanks, comments, garbage
    fn parse_line(&self, line: &str) -> Option<Proxy> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (host, port) = line.rsplit_once(':')?;
        let port: u16 = match port.parse() {
            Ok(p) => p,
            Err(_) => {
                warn!(source = %self.name, line, "Skipping list entry with invalid port");
                return None;
            }
        };

        Some(Proxy::new(host, port, self.protocol.as_str()))
    }
}

#[async_trait]
impl ProxySource for HttpListSource {
    async fn fetch_proxies(&self) -> Result<Vec<Proxy>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            CarouselError::SourceFetchFailed {
                source_name: self.name.clone(),
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(CarouselError::SourceFetchFailed {
                source_name: self.name.clone(),
                message: format!("unexpected status {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CarouselError::SourceFetchFailed {
                source_name: self.name.clone(),
                message: e.to_string(),
            })?;

        Ok(body.lines().filter_map(|l| self.parse_line(l)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
