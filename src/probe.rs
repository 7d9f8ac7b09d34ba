//! Health probing for proxy candidates
//!
//! A candidate only enters rotation after a live check: an IP-echo
//! request routed through the proxy must come back with the proxy's
//! own address. Anything else — transport failure, bad status, bad
//! body, or a different egress IP — fails the candidate.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::config::ProbeConfig;
use crate::models::Proxy;

/// Trait for proxy health checks
///
/// Seam between the pool manager and the network, so selection logic
/// can be tested with scripted verdicts.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Whether the proxy currently forwards traffic and reports the
    /// expected egress address. Never fails; all errors map to `false`.
    async fn does_work(&self, proxy: &Proxy) -> bool;
}

/// Expected body of the IP-echo endpoint
#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// Live HTTP health probe against an IP-echo endpoint
pub struct HttpHealthProbe {
    config: ProbeConfig,
}

impl HttpHealthProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Build a client routing all traffic through the candidate
    fn client_for(&self, proxy: &Proxy) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(self.config.timeout)
            .proxy(reqwest::Proxy::all(proxy.url())?)
            .build()
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn does_work(&self, proxy: &Proxy) -> bool {
        debug!(proxy = %proxy, url = %self.config.url, "Probing proxy");

        let client = match self.client_for(proxy) {
            Ok(c) => c,
            Err(e) => {
                error!(proxy = %proxy, error = %e, "Failed to build probe client");
                return false;
            }
        };

        let response = match client.get(&self.config.url).send().await {
            Ok(r) => r,
            Err(e) => {
                error!(proxy = %proxy, error = %e, "Probe request failed");
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            warn!(proxy = %proxy, status = %response.status(), "Probe returned non-200 status");
            return false;
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                error!(proxy = %proxy, error = %e, "Failed to read probe response body");
                return false;
            }
        };

        if body.is_empty() {
            warn!(proxy = %proxy, "Probe returned an empty body");
            return false;
        }

        let echo: IpEchoResponse = match serde_json::from_str(&body) {
            Ok(e) => e,
            Err(e) => {
                warn!(proxy = %proxy, error = %e, body = %body, "Probe response is not valid JSON");
                return false;
            }
        };

        if echo.ip != proxy.ip {
            warn!(
                proxy = %proxy,
                observed_ip = %echo.ip,
                "Egress IP does not match proxy address"
            );
            return false;
        }

        debug!(proxy = %proxy, "Proxy passed health probe");
        true
    }
}
