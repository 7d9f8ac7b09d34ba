//! Upstream proxy sources
//!
//! A source discovers proxy candidates — typically by scraping or
//! querying a public list. The pool manager unions all registered
//! sources on refill; a failing source contributes nothing and is
//! never fatal.

mod http_list;
mod static_list;

pub use http_list::HttpListSource;
pub use static_list::StaticSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Proxy;

/// Trait for proxy discovery sources
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Fetch a fresh batch of proxy candidates
    ///
    /// May return an empty list. Errors are absorbed by the pool
    /// manager (logged, treated as zero results).
    async fn fetch_proxies(&self) -> Result<Vec<Proxy>>;

    /// Source name, used in log context
    fn name(&self) -> &str;
}
