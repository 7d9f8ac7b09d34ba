//! Core value types

mod proxy;

pub use proxy::Proxy;
