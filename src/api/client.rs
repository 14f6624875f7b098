//! Shared API client.
//!
//! Runs requests through the configured transport chain and funnels every
//! failure through the normalizer, so callers only ever see the decoded body
//! or an [`ApiError`].

use crate::api::middleware::{
    normalize_failure, normalize_response, BearerAuth, TokenSource, TraceRequests,
};
use crate::api::transport::{
    ApiRequest, HttpMethod, RawResponse, ReqwestTransport, Transport, TransportFailure,
};
use crate::config::ApiConfig;
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Cheaply cloneable handle over a transport chain.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Wrap an already assembled transport chain.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Build the standard chain: reqwest transport, bearer auth, request tracing.
    ///
    /// The token source is asked for a credential on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn from_config(
        config: &ApiConfig,
        tokens: impl TokenSource + 'static,
    ) -> crate::error::Result<Self> {
        let base = ReqwestTransport::new(config)?;
        tracing::debug!("API client configured for {}", config.base_url);
        Ok(Self::new(TraceRequests::new(BearerAuth::new(base, tokens))))
    }

    /// Send a request and return the successful response.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for error statuses, missing responses and
    /// requests that could not be issued.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(normalize_failure)?;
        normalize_response(response)
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`]; decoding failures are reported as unknown errors.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.get_with_query(path, &[]).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`]; decoding failures are reported as unknown errors.
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |request, (key, value)| {
                request.with_query(*key, *value)
            });
        let response = self.execute(request).await?;
        decode_body(&response.body)
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`]; a body that fails to serialize is an unknown error.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(HttpMethod::Post, path, body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`]; a body that fails to serialize is an unknown error.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(HttpMethod::Put, path, body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(ApiRequest::delete(path)).await?;
        decode_body(&response.body)
    }

    /// Fetch a binary body without decoding it.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.execute(ApiRequest::get(path)).await?.body)
    }

    async fn send_json<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(body).map_err(|e| {
            normalize_failure(TransportFailure::BeforeRequest(format!(
                "Failed to serialize request body: {e}"
            )))
        })?;
        let response = self
            .execute(ApiRequest::new(method, path).with_body(payload))
            .await?;
        decode_body(&response.body)
    }
}

/// Decode a success body.
///
/// An empty body decodes as JSON `null`; a body that is not JSON is offered
/// to the target type as a plain string.
///
/// # Errors
///
/// Returns an unknown error when the body does not fit the target type.
pub fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R, ApiError> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(body).into_owned())
        })
    };
    serde_json::from_value(value)
        .map_err(|e| ApiError::unknown(format!("Failed to decode response body: {e}")))
}
