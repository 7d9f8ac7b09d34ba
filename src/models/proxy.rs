use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{CarouselError, Result};

/// An upstream proxy endpoint
///
/// A plain value: address, port, scheme, and whatever extra data the
/// source that discovered it wants to attach. The pool never mutates a
/// proxy after it has been handed in; rejected candidates are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proxy {
    pub ip: String,
    pub port: u16,
    #[serde(deserialize_with = "deserialize_lowercase")]
    protocol: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Proxy {
    /// Create a new proxy. The protocol is normalized to lower-case.
    pub fn new(ip: impl Into<String>, port: u16, protocol: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port,
            protocol: protocol.into().to_lowercase(),
            metadata: HashMap::new(),
        }
    }

    /// Parse a proxy from a URL like `http://1.2.3.4:8080`
    ///
    /// The scheme becomes the protocol; host and port are required.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)?;
        let host = url
            .host_str()
            .ok_or_else(|| CarouselError::InvalidProxyAddress(format!("missing host: {raw}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| CarouselError::InvalidProxyAddress(format!("missing port: {raw}")))?;

        Ok(Self::new(host, port, url.scheme()))
    }

    /// Attach provider-specific metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Replace the protocol, normalizing to lower-case
    pub fn set_protocol(&mut self, protocol: impl Into<String>) {
        self.protocol = protocol.into().to_lowercase();
    }

    /// Whether this proxy's protocol is in the allowed set
    ///
    /// An empty set allows everything.
    pub fn matches_protocols(&self, allowed: &[String]) -> bool {
        allowed.is_empty() || allowed.iter().any(|p| p == &self.protocol)
    }

    /// Proxy URL form, suitable for an HTTP client's proxy setting
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.ip, self.port)
    }
}

// Lower-case protocol is an invariant, even on the serde path
fn deserialize_lowercase<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.to_lowercase())
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_protocol_is_normalized_to_lowercase() {
        for input in ["HTTP", "Http", "http", "hTtP"] {
            let proxy = Proxy::new("1.2.3.4", 8080, input);
            assert_eq!(proxy.protocol(), "http");
        }

        let mut proxy = Proxy::new("1.2.3.4", 8080, "http");
        proxy.set_protocol("SOCKS5");
        assert_eq!(proxy.protocol(), "socks5");
    }

    #[test]
    fn test_display_format() {
        let proxy = Proxy::new("1.2.3.4", 8080, "https");
        assert_eq!(proxy.to_string(), "https://1.2.3.4:8080");
        assert_eq!(proxy.url(), "https://1.2.3.4:8080");
    }

    #[test]
    fn test_from_url() {
        let proxy = Proxy::from_url("socks5://10.0.0.9:1080").unwrap();
        assert_eq!(proxy.ip, "10.0.0.9");
        assert_eq!(proxy.port, 1080);
        assert_eq!(proxy.protocol(), "socks5");

        // Known default port is filled in for http
        let proxy = Proxy::from_url("http://10.0.0.9").unwrap();
        assert_eq!(proxy.port, 80);

        assert!(Proxy::from_url("not a url").is_err());
    }

    #[test]
    fn test_matches_protocols() {
        let proxy = Proxy::new("1.2.3.4", 8080, "socks5");
        let allowed = vec!["http".to_string(), "https".to_string()];
        assert!(!proxy.matches_protocols(&allowed));

        let proxy = Proxy::new("1.2.3.4", 8080, "http");
        assert!(proxy.matches_protocols(&allowed));

        // Empty set allows everything
        assert!(Proxy::new("1.2.3.4", 1, "gopher").matches_protocols(&[]));
    }

    #[test]
    fn test_metadata_round_trip() {
        let proxy = Proxy::new("1.2.3.4", 8080, "http")
            .with_metadata("country", json!("DE"))
            .with_metadata("latency_ms", json!(42));

        assert_eq!(proxy.metadata.get("country"), Some(&json!("DE")));
        assert_eq!(proxy.metadata.get("latency_ms"), Some(&json!(42)));

        let encoded = serde_json::to_string(&proxy).unwrap();
        let decoded: Proxy = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, proxy);
    }
}
