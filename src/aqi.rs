//! Air Quality Index bands.

use serde::{Deserialize, Serialize};

/// One of the six AQI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AqiCategory {
    /// 0-50
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    #[serde(rename = "UNHEALTHY_SENSITIVE")]
    UnhealthyForSensitiveGroups,
    /// 151-200
    Unhealthy,
    /// 201-300
    VeryUnhealthy,
    /// 301 and above
    Hazardous,
}

impl AqiCategory {
    /// Every band, lowest first
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    #[must_use]
    pub const fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    /// Hex color used to display the band
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Category code used by the backend
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            AqiCategory::Good => "GOOD",
            AqiCategory::Moderate => "MODERATE",
            AqiCategory::UnhealthyForSensitiveGroups => "UNHEALTHY_SENSITIVE",
            AqiCategory::Unhealthy => "UNHEALTHY",
            AqiCategory::VeryUnhealthy => "VERY_UNHEALTHY",
            AqiCategory::Hazardous => "HAZARDOUS",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Display color for an AQI value
#[must_use]
pub const fn aqi_color(aqi: u32) -> &'static str {
    AqiCategory::from_aqi(aqi).color()
}

/// Label for an AQI value
#[must_use]
pub const fn aqi_description(aqi: u32) -> &'static str {
    AqiCategory::from_aqi(aqi).description()
}
