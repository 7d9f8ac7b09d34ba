//! Proxy pool management
//!
//! The manager owns the working set of candidates and the currently
//! selected proxy. Callers ask it for a working proxy; it draws from
//! the shuffled pool, gates every candidate through the health probe,
//! and refills from the registered sources when the pool runs dry.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;
use crate::error::{CarouselError, Result};
use crate::models::Proxy;
use crate::probe::HealthProbe;
use crate::source::ProxySource;

/// Sources queried concurrently during a refill
const SOURCE_CONCURRENCY: usize = 4;

/// Options for a single `get_proxy` call
#[derive(Debug, Clone)]
pub struct GetProxyOptions {
    /// Re-probe the currently held proxy before returning it
    pub force_check: bool,
    /// Discard the currently held proxy and rotate to a fresh one
    pub force_skip: bool,
    /// Acceptable protocols; empty allows everything
    pub allowed_protocols: Vec<String>,
}

impl Default for GetProxyOptions {
    fn default() -> Self {
        Self {
            force_check: false,
            force_skip: false,
            allowed_protocols: vec!["http".to_string(), "https".to_string()],
        }
    }
}

/// Point-in-time pool statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub pool_size: usize,
    pub has_current: bool,
    pub refills: u64,
    pub last_refill: Option<DateTime<Utc>>,
}

/// Owns the candidate pool and the currently selected proxy
///
/// Designed for a single logical owner: all mutation goes through
/// `&mut self`, so exclusive access is enforced by the borrow checker.
/// Wrap the manager in `tokio::sync::Mutex` to share it across tasks.
pub struct ProxyPoolManager {
    sources: Vec<Arc<dyn ProxySource>>,
    probe: Arc<dyn HealthProbe>,
    config: PoolConfig,
    pool: VecDeque<Proxy>,
    current: Option<Proxy>,
    refills: u64,
    last_refill: Option<DateTime<Utc>>,
}

impl ProxyPoolManager {
    pub fn new(
        sources: Vec<Arc<dyn ProxySource>>,
        probe: Arc<dyn HealthProbe>,
        config: PoolConfig,
    ) -> Self {
        Self {
            sources,
            probe,
            config,
            pool: VecDeque::new(),
            current: None,
            refills: 0,
            last_refill: None,
        }
    }

    /// Register an additional source
    pub fn add_source(&mut self, source: Arc<dyn ProxySource>) {
        self.sources.push(source);
    }

    /// The currently held proxy, if any
    pub fn current(&self) -> Option<&Proxy> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            pool_size: self.pool.len(),
            has_current: self.current.is_some(),
            refills: self.refills,
            last_refill: self.last_refill,
        }
    }

    /// Get a working proxy
    ///
    /// Reuses the currently held proxy when it is still acceptable,
    /// otherwise draws a fresh candidate: pop from the shuffled pool,
    /// drop candidates outside the allowed protocols, gate the rest
    /// through the health probe, refilling from the sources whenever
    /// the pool empties.
    ///
    /// Returns `NoProxiesAvailable` when a full refill round yields
    /// nothing, and `AllProxiesExhausted` when the configured attempt
    /// budget runs out before a candidate passes.
    pub async fn get_proxy(&mut self, opts: GetProxyOptions) -> Result<Proxy> {
        let held_eligible = match &self.current {
            None => false,
            Some(p) => !opts.force_skip && p.matches_protocols(&opts.allowed_protocols),
        };

        if !held_eligible {
            if let Some(discarded) = self.current.take() {
                // Abandoned for this rotation: not probed, not re-queued.
                if opts.force_skip {
                    info!(proxy = %discarded, "Discarding current proxy on forced rotation");
                } else {
                    info!(
                        proxy = %discarded,
                        "Current proxy outside allowed protocols, discarding"
                    );
                }
            }

            if self.pool.is_empty() {
                self.refill().await;
            }

            let replacement = self.draw(&opts.allowed_protocols).await?;
            self.current = Some(replacement);
        }

        if opts.force_check {
            if let Some(held) = self.current.clone() {
                info!(proxy = %held, "Revalidating current proxy");
                if !self.probe.does_work(&held).await {
                    warn!(proxy = %held, "Current proxy failed revalidation, rotating");
                    self.current = None;
                    let replacement = self.draw(&opts.allowed_protocols).await?;
                    self.current = Some(replacement);
                }
            }
        }

        self.current.clone().ok_or(CarouselError::NoProxiesAvailable)
    }

    /// Draw loop: pop candidates until one passes the probe
    async fn draw(&mut self, allowed_protocols: &[String]) -> Result<Proxy> {
        let mut attempts: u32 = 0;

        loop {
            if self.config.max_draw_attempts > 0 && attempts >= self.config.max_draw_attempts {
                return Err(CarouselError::AllProxiesExhausted { attempts });
            }

            let candidate = match self.pool.pop_front() {
                Some(c) => c,
                None => {
                    self.refill().await;
                    match self.pool.pop_front() {
                        Some(c) => c,
                        // A full refill round yielded nothing; bail out
                        // instead of hammering the sources in a loop.
                        None => return Err(CarouselError::NoProxiesAvailable),
                    }
                }
            };
            attempts += 1;

            if !candidate.matches_protocols(allowed_protocols) {
                debug!(proxy = %candidate, "Candidate outside allowed protocols, skipping");
                continue;
            }

            info!(proxy = %candidate, "Checking candidate proxy");
            if self.probe.does_work(&candidate).await {
                return Ok(candidate);
            }

            warn!(proxy = %candidate, "Candidate failed health probe, discarding");
        }
    }

    /// Query every source, union the results, shuffle, replace the pool
    ///
    /// A failing or timed-out source contributes nothing; the round
    /// always completes.
    async fn refill(&mut self) {
        info!(sources = self.sources.len(), "Refilling proxy pool");

        let timeout = self.config.source_timeout;
        let batches = futures::stream::iter(self.sources.iter().cloned())
            .map(|source| async move {
                match tokio::time::timeout(timeout, source.fetch_proxies()).await {
                    Ok(Ok(proxies)) => {
                        debug!(source = source.name(), count = proxies.len(), "Source yielded proxies");
                        proxies
                    }
                    Ok(Err(e)) => {
                        error!(source = source.name(), error = %e, "Source failed to fetch proxies");
                        Vec::new()
                    }
                    Err(_) => {
                        error!(source = source.name(), "Source fetch timed out");
                        Vec::new()
                    }
                }
            })
            .buffer_unordered(SOURCE_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        let mut combined: Vec<Proxy> = batches.into_iter().flatten().collect();
        combined.shuffle(&mut rand::thread_rng());

        self.pool = combined.into();
        self.refills += 1;
        self.last_refill = Some(Utc::now());

        info!(pool_size = self.pool.len(), "Proxy pool refilled");
    }
}
