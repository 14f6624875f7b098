//! Base HTTP transport and the request/response types passed between stages.
//!
//! A transport performs a single network call and hands back whatever the
//! server answered, error statuses included. Classifying failures is left to
//! the client so every stage stays a plain `Transport` decorator.

use crate::config::ApiConfig;
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportFailure>> + Send + 'a>>;

/// A stage able to carry an [`ApiRequest`] to the backend.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        (**self).send(request)
    }
}

/// HTTP verbs used by the AirAware API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    const fn to_reqwest(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
            HttpMethod::Put => f.write_str("PUT"),
            HttpMethod::Delete => f.write_str("DELETE"),
        }
    }
}

/// A request relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Whatever the server sent back, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A call that produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The request went out but nothing came back (connect error, timeout, cut body)
    NoResponse(String),
    /// The request could not be built or issued
    BeforeRequest(String),
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::NoResponse(msg) => write!(f, "no response: {msg}"),
            TransportFailure::BeforeRequest(msg) => write!(f, "request not sent: {msg}"),
        }
    }
}

/// Transport backed by a shared `reqwest::Client`.
///
/// Holds the base URL, timeout and default headers from [`ApiConfig`].
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    default_headers: BTreeMap<String, String>,
}

impl ReqwestTransport {
    /// Build the transport from the API settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> crate::error::Result<Self> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_headers: config.headers.clone(),
        })
    }

    /// Resolve a request path against the base URL.
    ///
    /// Paths are appended to the base URL (keeping any base path prefix);
    /// absolute URLs are used as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined URL does not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute);
        }
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{path}", self.base_url))
    }

    fn classify(error: &reqwest::Error) -> TransportFailure {
        if error.is_builder() {
            TransportFailure::BeforeRequest(error.to_string())
        } else {
            TransportFailure::NoResponse(error.to_string())
        }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let url = self
                .url_for(&request.path)
                .map_err(|e| TransportFailure::BeforeRequest(format!("Invalid URL: {e}")))?;

            let mut builder = self.client.request(request.method.to_reqwest(), url);

            for (name, value) in &self.default_headers {
                if !request.headers.contains_key(name) {
                    builder = builder.header(name.as_str(), value.as_str());
                }
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| Self::classify(&e))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportFailure::NoResponse(format!("Failed to read body: {e}")))?
                .to_vec();

            debug!("Received {status} with {} body bytes", body.len());
            Ok(RawResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base_url: &str) -> ReqwestTransport {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        ReqwestTransport::new(&config).unwrap()
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let transport = transport("http://localhost:8000/api/");
        assert_eq!(
            transport.url_for("/sensors").unwrap().as_str(),
            "http://localhost:8000/api/sensors"
        );
        assert_eq!(
            transport.url_for("alerts/7").unwrap().as_str(),
            "http://localhost:8000/api/alerts/7"
        );
    }

    #[test]
    fn test_url_for_accepts_absolute_urls() {
        let transport = transport("https://api.airaware.com");
        assert_eq!(
            transport.url_for("https://cdn.example.com/r.pdf").unwrap().as_str(),
            "https://cdn.example.com/r.pdf"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ApiConfig {
            base_url: "::nope::".to_string(),
            ..ApiConfig::default()
        };
        assert!(ReqwestTransport::new(&config).is_err());
    }

    #[test]
    fn test_request_builder_helpers() {
        let request = ApiRequest::get("/air-quality/delhi/history")
            .with_query("startDate", "2024-01-01")
            .with_header("X-Trace", "1");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.query,
            vec![("startDate".to_string(), "2024-01-01".to_string())]
        );
        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_raw_response_success_range() {
        let mut response = RawResponse {
            status: 204,
            headers: BTreeMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());
        response.status = 404;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }
}
