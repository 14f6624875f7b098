//! API client module for the AirAware backend.
//!
//! A base reqwest transport wrapped in bearer-auth and tracing stages, a
//! client that normalizes every failure, and a façade with one call per
//! backend resource.

pub mod client;
pub mod middleware;
pub mod service;
pub mod transport;
pub mod types;
