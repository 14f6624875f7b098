//! Custom error types for the AirAware client
//!
//! This module defines the crate-wide error type used for configuration and
//! setup failures, and the normalized `ApiError` that every API call rejects
//! with once a request has been attempted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Message used when the server answers with an error status but no message body.
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred";

/// Message used when a request was dispatched but no response came back.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Message used when a failure outside the request cycle carries no text of its own.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Main error type for the AirAware client
#[derive(Debug)]
pub enum AirAwareError {
    /// A normalized API failure
    Api(ApiError),

    /// Error occurred while reading a file (configuration or storage)
    Io(std::io::Error),

    /// Error occurred while parsing the JSON5 configuration
    ConfigParse(json5::Error),

    /// Error occurred while (de)serializing JSON
    Json(serde_json::Error),

    /// Error occurred while parsing a URL
    UrlParse(url::ParseError),

    /// Error occurred while building the HTTP client
    Http(reqwest::Error),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for AirAwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirAwareError::Api(e) => write!(f, "{e}"),
            AirAwareError::Io(e) => write!(f, "Failed to read file: {e}"),
            AirAwareError::ConfigParse(e) => write!(f, "Failed to parse configuration: {e}"),
            AirAwareError::Json(e) => write!(f, "JSON error: {e}"),
            AirAwareError::UrlParse(e) => write!(f, "Invalid URL: {e}"),
            AirAwareError::Http(e) => write!(f, "HTTP client error: {e}"),
            AirAwareError::Generic(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for AirAwareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AirAwareError::Api(e) => Some(e),
            AirAwareError::Io(e) => Some(e),
            AirAwareError::ConfigParse(e) => Some(e),
            AirAwareError::Json(e) => Some(e),
            AirAwareError::UrlParse(e) => Some(e),
            AirAwareError::Http(e) => Some(e),
            AirAwareError::Generic(_) => None,
        }
    }
}

impl From<ApiError> for AirAwareError {
    fn from(error: ApiError) -> Self {
        AirAwareError::Api(error)
    }
}

impl From<std::io::Error> for AirAwareError {
    fn from(error: std::io::Error) -> Self {
        AirAwareError::Io(error)
    }
}

impl From<json5::Error> for AirAwareError {
    fn from(error: json5::Error) -> Self {
        AirAwareError::ConfigParse(error)
    }
}

impl From<serde_json::Error> for AirAwareError {
    fn from(error: serde_json::Error) -> Self {
        AirAwareError::Json(error)
    }
}

impl From<url::ParseError> for AirAwareError {
    fn from(error: url::ParseError) -> Self {
        AirAwareError::UrlParse(error)
    }
}

impl From<reqwest::Error> for AirAwareError {
    fn from(error: reqwest::Error) -> Self {
        AirAwareError::Http(error)
    }
}

impl From<&str> for AirAwareError {
    fn from(message: &str) -> Self {
        AirAwareError::Generic(message.to_string())
    }
}

impl From<String> for AirAwareError {
    fn from(message: String) -> Self {
        AirAwareError::Generic(message)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, AirAwareError>;

/// Which of the three failure cases produced an [`ApiError`].
///
/// Serializes as the HTTP status number, or as the strings `"network_error"`
/// and `"unknown_error"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// The server responded with this error status
    Http(u16),
    /// The request was sent but no response was received
    NetworkError,
    /// The failure happened before a request was issued
    UnknownError,
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStatus::Http(code) => write!(f, "{code}"),
            ErrorStatus::NetworkError => f.write_str("network_error"),
            ErrorStatus::UnknownError => f.write_str("unknown_error"),
        }
    }
}

impl Serialize for ErrorStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ErrorStatus::Http(code) => serializer.serialize_u16(*code),
            ErrorStatus::NetworkError => serializer.serialize_str("network_error"),
            ErrorStatus::UnknownError => serializer.serialize_str("unknown_error"),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(ErrorStatus::Http(code)),
            Raw::Text(text) => match text.as_str() {
                "network_error" => Ok(ErrorStatus::NetworkError),
                "unknown_error" => Ok(ErrorStatus::UnknownError),
                other => Err(serde::de::Error::custom(format!(
                    "unrecognized error status: {other}"
                ))),
            },
        }
    }
}

/// The uniform error every API call rejects with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub status: ErrorStatus,
}

impl ApiError {
    /// Server answered with `status`; falls back to the generic server message.
    #[must_use]
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| SERVER_ERROR_MESSAGE.to_string());
        Self {
            message,
            status: ErrorStatus::Http(status),
        }
    }

    #[must_use]
    pub fn network() -> Self {
        Self {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: ErrorStatus::NetworkError,
        }
    }

    /// Failure outside the request/response cycle, keeping the original message.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            message,
            status: ErrorStatus::UnknownError,
        }
    }

    /// HTTP status code, when the server produced one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            ErrorStatus::Http(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_error_defaults_message() {
        let err = ApiError::server(404, None);
        assert_eq!(err.message, "Server error occurred");
        assert_eq!(err.status, ErrorStatus::Http(404));

        let err = ApiError::server(500, Some(String::new()));
        assert_eq!(err.message, "Server error occurred");
    }

    #[test]
    fn test_unknown_error_keeps_message() {
        assert_eq!(ApiError::unknown("X").message, "X");
        assert_eq!(ApiError::unknown("").message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_api_error_serialized_shape() {
        let value = serde_json::to_value(ApiError::server(404, None)).unwrap();
        assert_eq!(
            value,
            json!({"message": "Server error occurred", "status": 404})
        );

        let value = serde_json::to_value(ApiError::network()).unwrap();
        assert_eq!(value["status"], "network_error");

        let value = serde_json::to_value(ApiError::unknown("boom")).unwrap();
        assert_eq!(value, json!({"message": "boom", "status": "unknown_error"}));
    }

    #[test]
    fn test_error_status_parses_both_forms() {
        let status: ErrorStatus = serde_json::from_value(json!(503)).unwrap();
        assert_eq!(status, ErrorStatus::Http(503));
        let status: ErrorStatus = serde_json::from_value(json!("network_error")).unwrap();
        assert_eq!(status, ErrorStatus::NetworkError);
        assert!(serde_json::from_value::<ErrorStatus>(json!("teapot")).is_err());
    }

    #[test]
    fn test_generic_error_display() {
        let err = AirAwareError::from("Timeout must be greater than zero");
        assert_eq!(err.to_string(), "Error: Timeout must be greater than zero");
    }
}
