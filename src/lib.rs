//! # AirAware Client Library
//!
//! This library provides the client side of the AirAware air quality service:
//! a configured HTTP client for the AirAware REST API, a typed façade over its
//! resources, and the formatting helpers used to present readings.
//!
//! ## Overview
//!
//! - `api`: HTTP transport, middleware stages, the normalizing client and the service façade
//! - `aqi`: Air Quality Index bands with their colors and labels
//! - `config`: Configuration loading from a JSON5 file and the environment
//! - `contact`: Contact form validation and cancellable submission
//! - `debounce`: Trailing-edge debouncing of bursts of calls
//! - `error`: The crate error type and the normalized `ApiError`
//! - `storage`: A small persistent key-value store
//! - `utils`: Date, number, email and temperature helpers
//!
//! ## Getting Started
//!
//! ```no_run
//! use airaware::api::{client::ApiClient, service::AirAwareService};
//! use airaware::config::{Config, CONFIG_FILE};
//! use airaware::storage::KeyValueStore;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), airaware::error::AirAwareError> {
//!     let config = Config::load(Path::new(CONFIG_FILE))?;
//!     let tokens = KeyValueStore::new(config.storage_path.0.clone());
//!     let service = AirAwareService::new(ApiClient::from_config(&config.api, tokens)?);
//!
//!     let reading = service.get_air_quality("delhi").await?;
//!     println!("AQI {} ({})", reading.aqi, reading.category());
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Once a request is attempted, every failure is reported as an `ApiError`
//! with one of three statuses: the HTTP status the server answered with,
//! `network_error` when no response arrived, or `unknown_error` when the
//! request could not be issued at all.

/// API client module
///
/// The transport chain, the client that classifies failures into `ApiError`,
/// request and response types, and the per-resource service façade.
pub mod api;

/// Air Quality Index bands
pub mod aqi;

/// Configuration management module
///
/// Loads the API, storage and contact settings from a JSON5 file, applying
/// defaults for anything missing and the `AIRAWARE_API_URL` override.
pub mod config;

/// Contact form module
pub mod contact;

/// Debouncing helper
pub mod debounce;

/// Custom error types module
///
/// Defines the `AirAwareError` enum for setup failures and the normalized
/// `ApiError` shared by every API call.
pub mod error;

/// Persistent key-value storage
pub mod storage;

/// Utility functions module
///
/// Formatting and validation helpers: long dates, thousands separators,
/// email syntax, temperature conversion and short random identifiers.
pub mod utils;
