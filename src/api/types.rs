//! Request and response types for the AirAware backend API.
//!
//! Response fields beyond identifiers are optional and unknown fields are
//! ignored, so partial payloads still decode. Decimal columns may arrive as
//! JSON numbers or as strings.

use crate::aqi::AqiCategory;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accept `12.5`, `"12.50"` or `null` for an optional decimal field.
fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal: {text}"))),
    }
}

/// A single air quality measurement
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AirQualityReading {
    pub id: Option<String>,
    pub station: Option<String>,
    pub location: Option<String>,
    pub aqi: u32,
    pub aqi_category: Option<String>,
    #[serde(deserialize_with = "flexible_f64")]
    pub pm25: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub pm10: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub no2: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub so2: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub co: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub o3: Option<f64>,
    /// Degrees Celsius
    #[serde(deserialize_with = "flexible_f64")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub wind_speed: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub wind_direction: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub pressure: Option<f64>,
    pub measured_at: Option<DateTime<Utc>>,
    pub data_source: Option<String>,
}

impl AirQualityReading {
    /// Band of this reading, computed from the AQI value.
    #[must_use]
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }
}

/// A monitoring station or sensor
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Sensor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub station_type: Option<String>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Account creation payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login payload for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned by the authentication endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub message: Option<String>,
    pub user: Option<serde_json::Value>,
}

impl AuthResponse {
    /// The bearer credential, whichever field the backend used for it.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().or(self.access.as_deref())
    }
}

/// The signed-in user's profile
///
/// Fields not modelled here are kept in `extra` so an update sends them back.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub health_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    /// AQI above which the user wants to be alerted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An air quality alert
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Alert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `AQI_THRESHOLD`, `HEALTH_WARNING`, `POLLUTION_SPIKE` or `WEATHER_IMPACT`
    pub alert_type: String,
    /// `LOW`, `MEDIUM`, `HIGH` or `CRITICAL`
    pub severity: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aqi_value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parameters for `POST /reports/generate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Handle for a generated report
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reading_accepts_decimal_strings() {
        let reading: AirQualityReading = serde_json::from_value(json!({
            "id": "r1",
            "aqi": 163,
            "pm25": "78.40",
            "pm10": 120.5,
            "temperature": null,
            "humidity": "",
            "measured_at": "2024-01-05T15:07:00Z",
            "unexpected": true
        }))
        .unwrap();

        assert_eq!(reading.pm25, Some(78.4));
        assert_eq!(reading.pm10, Some(120.5));
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.category(), AqiCategory::Unhealthy);
    }

    #[test]
    fn test_reading_rejects_garbage_decimal() {
        let result = serde_json::from_value::<AirQualityReading>(json!({"aqi": 10, "co": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "a@b.co",
            "alert_threshold": 150,
            "location_lat": "28.61"
        }))
        .unwrap();
        assert_eq!(profile.alert_threshold, Some(150));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["location_lat"], "28.61");
        assert!(back.get("username").is_none());
    }

    #[test]
    fn test_auth_response_token_fields() {
        let auth: AuthResponse = serde_json::from_value(json!({"access": "jwt"})).unwrap();
        assert_eq!(auth.bearer_token(), Some("jwt"));

        let auth: AuthResponse =
            serde_json::from_value(json!({"token": "tok", "access": "jwt"})).unwrap();
        assert_eq!(auth.bearer_token(), Some("tok"));
    }

    #[test]
    fn test_report_request_wire_names() {
        let request = ReportRequest {
            report_type: "monthly".to_string(),
            location: Some("delhi".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: None,
            format: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"reportType": "monthly", "location": "delhi", "startDate": "2024-01-01"})
        );
    }
}
