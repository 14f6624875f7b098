//! Stages wrapped around the base transport.
//!
//! `BearerAuth` injects the credential, `TraceRequests` logs each call, and
//! the `normalize_*` functions turn raw outcomes into [`ApiError`]s.

use crate::api::transport::{
    ApiRequest, RawResponse, Transport, TransportFailure, TransportFuture,
};
use crate::error::ApiError;
use std::sync::Arc;
use tracing::{debug, error};

/// Header carrying the bearer credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Longest error body excerpt written to the debug log, in characters
const BODY_PREVIEW_CHARS: usize = 512;

/// Supplies the bearer token, consulted once per request.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// A fixed credential handed over at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Arc<S> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Set `Authorization: Bearer <token>` when a non-empty token is given.
#[must_use]
pub fn attach_bearer(mut request: ApiRequest, token: Option<&str>) -> ApiRequest {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        request
            .headers
            .insert(AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}"));
    }
    request
}

/// Stage that adds the bearer credential from a [`TokenSource`].
///
/// The source is consulted on the blocking pool, since file-backed sources
/// do synchronous I/O.
pub struct BearerAuth<T, S> {
    inner: T,
    source: Arc<S>,
}

impl<T, S> BearerAuth<T, S> {
    pub fn new(inner: T, source: S) -> Self {
        Self {
            inner,
            source: Arc::new(source),
        }
    }
}

impl<T: Transport, S: TokenSource + 'static> Transport for BearerAuth<T, S> {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        let source = Arc::clone(&self.source);
        Box::pin(async move {
            let token = tokio::task::spawn_blocking(move || source.token())
                .await
                .map_err(|e| {
                    TransportFailure::BeforeRequest(format!("Failed to read bearer token: {e}"))
                })?;
            self.inner
                .send(attach_bearer(request, token.as_deref()))
                .await
        })
    }
}

/// Stage that logs every call and its outcome.
pub struct TraceRequests<T> {
    inner: T,
}

impl<T> TraceRequests<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Transport> Transport for TraceRequests<T> {
    fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let label = format!("{} {}", request.method, request.path);
            debug!("Sending {label}");
            let result = self.inner.send(request).await;
            match &result {
                Ok(response) => debug!("{label} answered {}", response.status),
                Err(failure) => debug!("{label} failed: {failure}"),
            }
            result
        })
    }
}

/// Map a transport failure onto the network or unknown error case.
#[must_use]
pub fn normalize_failure(failure: TransportFailure) -> ApiError {
    match failure {
        TransportFailure::NoResponse(detail) => {
            error!("Network Error: {detail}");
            ApiError::network()
        }
        TransportFailure::BeforeRequest(message) => {
            error!("Error: {message}");
            ApiError::unknown(message)
        }
    }
}

/// Pass 2xx responses through; turn anything else into a server error.
///
/// The message comes from a `message` string field of a JSON body, when present.
///
/// # Errors
///
/// Returns the normalized server error for non-2xx statuses.
pub fn normalize_response(response: RawResponse) -> Result<RawResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    error!("API Error: {}", response.status);
    debug!("API Error body: {}", body_preview(&response.body));

    let message = serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        });
    Err(ApiError::server(response.status, message))
}

/// Lossy text of an error body, cut to a bounded excerpt for logging.
fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}... ({} bytes)", &text[..end], body.len()),
        None => text.into_owned(),
    }
}
