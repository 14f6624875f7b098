//! One call per backend resource.
//!
//! Each method shapes the path, query and payload and delegates to the
//! [`ApiClient`]; errors come back exactly as the client normalized them.

use crate::api::client::ApiClient;
use crate::api::types::{
    AirQualityReading, Alert, AuthResponse, LoginRequest, RegisterRequest, Report, ReportRequest,
    Sensor, UserProfile,
};
use crate::api::middleware::normalize_failure;
use crate::api::transport::TransportFailure;
use crate::contact::ContactForm;
use crate::error::ApiError;
use chrono::NaiveDate;
use serde_json::Value;

/// Query date format for history ranges
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Percent-encode a caller-supplied path segment.
///
/// URL parsing resolves `.` and `..` even when percent-encoded, and an empty
/// segment addresses the parent collection, so those are refused outright.
fn segment(value: &str) -> Result<String, ApiError> {
    if matches!(value, "" | "." | "..") {
        return Err(normalize_failure(TransportFailure::BeforeRequest(format!(
            "Invalid path segment: {value:?}"
        ))));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// Typed access to the AirAware backend
#[derive(Clone)]
pub struct AirAwareService {
    client: ApiClient,
}

impl AirAwareService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `GET /air-quality/{location}`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_air_quality(&self, location: &str) -> Result<AirQualityReading, ApiError> {
        self.client
            .get(&format!("/air-quality/{}", segment(location)?))
            .await
    }

    /// `GET /air-quality/{location}/history?startDate&endDate`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_air_quality_history(
        &self,
        location: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AirQualityReading>, ApiError> {
        let start = start_date.format(DATE_FORMAT).to_string();
        let end = end_date.format(DATE_FORMAT).to_string();
        self.client
            .get_with_query(
                &format!("/air-quality/{}/history", segment(location)?),
                &[("startDate", start.as_str()), ("endDate", end.as_str())],
            )
            .await
    }

    /// `GET /sensors`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_sensors(&self) -> Result<Vec<Sensor>, ApiError> {
        self.client.get("/sensors").await
    }

    /// `GET /sensors/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_sensor_details(&self, sensor_id: &str) -> Result<Sensor, ApiError> {
        self.client
            .get(&format!("/sensors/{}", segment(sensor_id)?))
            .await
    }

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn register_user(&self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/register", user).await
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn login_user(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post("/auth/login", credentials).await
    }

    /// `GET /user/profile`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_user_profile(&self) -> Result<UserProfile, ApiError> {
        self.client.get("/user/profile").await
    }

    /// `PUT /user/profile`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn update_user_profile(
        &self,
        profile: &UserProfile,
    ) -> Result<UserProfile, ApiError> {
        self.client.put("/user/profile", profile).await
    }

    /// `GET /alerts`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn get_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.client.get("/alerts").await
    }

    /// `POST /alerts`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn create_alert(&self, alert: &Alert) -> Result<Alert, ApiError> {
        self.client.post("/alerts", alert).await
    }

    /// `PUT /alerts/{id}`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn update_alert(&self, alert_id: &str, alert: &Alert) -> Result<Alert, ApiError> {
        self.client
            .put(&format!("/alerts/{}", segment(alert_id)?), alert)
            .await
    }

    /// `DELETE /alerts/{id}`; yields whatever body the server sent, `Null` when empty
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn delete_alert(&self, alert_id: &str) -> Result<Value, ApiError> {
        self.client
            .delete(&format!("/alerts/{}", segment(alert_id)?))
            .await
    }

    /// `POST /contact`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn submit_contact_form(&self, form: &ContactForm) -> Result<Value, ApiError> {
        self.client.post("/contact", form).await
    }

    /// `POST /reports/generate`
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn generate_report(&self, params: &ReportRequest) -> Result<Report, ApiError> {
        self.client.post("/reports/generate", params).await
    }

    /// `GET /reports/{id}/download` as raw bytes
    ///
    /// # Errors
    ///
    /// Returns the normalized error produced by the client.
    pub async fn download_report(&self, report_id: &str) -> Result<Vec<u8>, ApiError> {
        self.client
            .get_bytes(&format!("/reports/{}/download", segment(report_id)?))
            .await
    }
}
