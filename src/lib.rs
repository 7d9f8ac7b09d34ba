//! Carousel - Rotating Proxy Pool
//!
//! A client-side proxy rotation library written in Rust.
//!
//! ## Features
//!
//! - Aggregates proxy candidates from any number of pluggable sources
//! - Shuffled pool with automatic refill on exhaustion
//! - Live health probing: a candidate enters rotation only after an
//!   IP-echo request through it comes back with its own address
//! - Sticky current proxy with forced rotation and revalidation
//! - Protocol filtering per call (http/https by default)
//! - Typed exhaustion errors with a configurable attempt budget

pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod probe;
pub mod source;

pub use config::{Config, PoolConfig, ProbeConfig};
pub use error::{CarouselError, Result};
pub use models::Proxy;
pub use pool::{GetProxyOptions, PoolStats, ProxyPoolManager};
pub use probe::{HealthProbe, HttpHealthProbe};
pub use source::{HttpListSource, ProxySource, StaticSource};
