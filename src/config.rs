use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default configuration file name looked up by the command-line tool
pub const CONFIG_FILE: &str = "airaware.json5";

/// Environment variable that replaces the configured API base URL
pub const API_URL_ENV: &str = "AIRAWARE_API_URL";

/// Base URL used when neither the config file nor the environment provide one
pub const DEFAULT_API_URL: &str = "https://api.airaware.com";

/// Request timeout applied when the config file does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// File backing the key-value store when none is configured
pub const DEFAULT_STORAGE_FILE: &str = "airaware-storage.json";

/// Delay used by the simulated contact form submission
pub const DEFAULT_CONTACT_DELAY_MS: u64 = 1000;

/// Application configuration structure
///
/// Every section falls back to its defaults when missing from the file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// HTTP client settings
    pub api: ApiConfig,
    /// Path of the JSON file backing the key-value store
    pub storage_path: StoragePath,
    /// Contact form behaviour and texts
    pub contact: ContactConfig,
}

/// Settings for the shared HTTP client
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute URL every request path is resolved against
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headers,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Location of the key-value store file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct StoragePath(pub PathBuf);

impl Default for StoragePath {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_STORAGE_FILE))
    }
}

/// How a contact form submission is delivered
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactDelivery {
    /// Wait for a fixed delay and report success without sending anything
    #[default]
    Simulated,
    /// POST the form to the `/contact` endpoint
    Api,
}

impl std::fmt::Display for ContactDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactDelivery::Simulated => f.write_str("simulated"),
            ContactDelivery::Api => f.write_str("api"),
        }
    }
}

/// Title and description shown after a submission attempt
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Contact form settings and the public contact details shown next to it
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContactConfig {
    pub delivery: ContactDelivery,
    /// Delay of a simulated submission, in milliseconds
    pub simulated_delay_ms: u64,
    pub contact_email: String,
    pub website_url: String,
    pub support_phone: String,
    pub success_message: Notice,
    pub error_message: Notice,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            delivery: ContactDelivery::default(),
            simulated_delay_ms: DEFAULT_CONTACT_DELAY_MS,
            contact_email: "contact@airaware.in".to_string(),
            website_url: "https://airaware.in".to_string(),
            support_phone: "+911123456789".to_string(),
            success_message: Notice {
                title: "Message Sent Successfully!".to_string(),
                description: "Thank you for reaching out! We'll respond within 24 hours."
                    .to_string(),
            },
            error_message: Notice {
                title: "Message Failed to Send".to_string(),
                description: "Please try again or email us directly.".to_string(),
            },
        }
    }
}

impl ContactConfig {
    #[must_use]
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    /// Direct contact channels, one per line, skipping blank entries
    #[must_use]
    pub fn contact_details(&self) -> String {
        [
            ("Email", &self.contact_email),
            ("Website", &self.website_url),
            ("Phone", &self.support_phone),
        ]
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Config {
    /// Load the configuration from a JSON5 file and apply environment overrides.
    ///
    /// A missing file is not an error: the defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the resulting configuration fails validation.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());

        let mut config = if path.exists() {
            let config_str = fs::read_to_string(path)?;
            json5::from_str::<Config>(&config_str)?
        } else {
            tracing::info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Config::default()
        };

        config.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        config.validate()?;

        tracing::info!("Configuration loaded, API base URL: {}", config.api.base_url);
        Ok(config)
    }

    /// Replace the base URL with a deployment-provided value, ignoring blanks.
    pub fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Overriding API base URL from {API_URL_ENV}");
            self.api.base_url = url.trim().to_string();
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute URL or the timeout is zero
    pub fn validate(&self) -> crate::error::Result<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.cannot_be_a_base() {
            return Err(crate::error::AirAwareError::from(format!(
                "Base URL cannot be used as a base: {}",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(crate::error::AirAwareError::from(
                "Timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.airaware.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.api.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.contact.delivery, ContactDelivery::Simulated);
        assert_eq!(config.contact.simulated_delay_ms, 1000);
        assert_eq!(config.contact.simulated_delay(), Duration::from_secs(1));
        assert_eq!(config.storage_path.0, PathBuf::from(DEFAULT_STORAGE_FILE));
    }

    #[test]
    fn test_contact_details() {
        let mut contact = ContactConfig::default();
        assert_eq!(
            contact.contact_details(),
            "Email: contact@airaware.in\nWebsite: https://airaware.in\nPhone: +911123456789"
        );

        contact.support_phone = " ".to_string();
        contact.website_url.clear();
        assert_eq!(contact.contact_details(), "Email: contact@airaware.in");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{{ api: {{ base_url: 'http://localhost:8000/api', }}, contact: {{ delivery: 'api' }} }}"
        )
        .unwrap();

        let config: Config =
            json5::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.contact.delivery, ContactDelivery::Api);
        assert_eq!(config.contact.simulated_delay_ms, DEFAULT_CONTACT_DELAY_MS);
    }

    #[test]
    fn test_override_ignores_blank_values() {
        let mut config = Config::default();
        config.apply_api_url_override(Some("   ".to_string()));
        assert_eq!(config.api.base_url, DEFAULT_API_URL);

        config.apply_api_url_override(Some(" http://127.0.0.1:9000 ".to_string()));
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Error: Timeout must be greater than zero"
        );
    }

    #[test]
    fn test_contact_delivery_display() {
        assert_eq!(ContactDelivery::Simulated.to_string(), "simulated");
        assert_eq!(ContactDelivery::Api.to_string(), "api");
    }
}
