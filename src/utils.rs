use chrono::{DateTime, NaiveDate, TimeZone};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Format a timestamp as a long US date with time
///
/// The output looks like "January 5, 2024 at 03:07 PM", in the timestamp's own offset.
///
/// # Examples
///
/// ```
/// use airaware::utils::format_date;
/// use chrono::{TimeZone, Utc};
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 5, 15, 7, 0).unwrap();
/// assert_eq!(format_date(&date), "January 5, 2024 at 03:07 PM");
/// ```
#[must_use]
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y at %I:%M %p").to_string()
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date and format it
///
/// Returns `None` when the input is neither.
#[must_use]
pub fn format_date_str(input: &str) -> Option<String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(input.trim()) {
        return Some(format_date(&date));
    }
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(format_date(&midnight))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern should compile")
    })
}

/// Loose syntactic email check: something, `@`, something, `.`, something
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Insert thousands separators
///
/// # Examples
///
/// ```
/// use airaware::utils::format_number;
///
/// assert_eq!(format_number(1_234_567), "1,234,567");
/// assert_eq!(format_number(-4200), "-4,200");
/// ```
#[must_use]
pub fn format_number(num: i64) -> String {
    let digits = num.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if num < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Share of `value` in `total` as a whole percentage, halves rounded up
///
/// Returns 0 when `total` is 0.
#[must_use]
pub fn calculate_percentage(value: f64, total: f64) -> i64 {
    if total == 0.0 {
        return 0;
    }
    // Percentages of sensor readings stay far inside the i64 range
    #[allow(clippy::cast_possible_truncation)]
    {
        ((value / total) * 100.0 + 0.5).floor() as i64
    }
}

/// Temperature scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl std::str::FromStr for TemperatureUnit {
    type Err = crate::error::AirAwareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "c" => Ok(TemperatureUnit::Celsius),
            "F" | "f" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(crate::error::AirAwareError::from(format!(
                "Unknown temperature unit: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("C"),
            TemperatureUnit::Fahrenheit => f.write_str("F"),
        }
    }
}

/// Convert a temperature between scales; identity when both units match
#[must_use]
pub fn convert_temperature(temp: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => temp * 9.0 / 5.0 + 32.0,
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => (temp - 32.0) * 5.0 / 9.0,
        _ => temp,
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Short random identifier: `_` followed by nine base-36 characters
#[must_use]
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 15, 7, 0).unwrap();
        assert_eq!(format_date(&date), "January 5, 2024 at 03:07 PM");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let date = ist.with_ymd_and_hms(2023, 11, 20, 9, 30, 0).unwrap();
        assert_eq!(format_date(&date), "November 20, 2023 at 09:30 AM");
    }

    #[test]
    fn test_format_date_str() {
        assert_eq!(
            format_date_str("2024-03-10T00:45:00+00:00").as_deref(),
            Some("March 10, 2024 at 12:45 AM")
        );
        assert_eq!(
            format_date_str("2024-03-10").as_deref(),
            Some("March 10, 2024 at 12:00 AM")
        );
        assert!(format_date_str("yesterday").is_none());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@air-aware.in"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(-1_000_000), "-1,000,000");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn test_convert_temperature() {
        use TemperatureUnit::{Celsius, Fahrenheit};

        assert!((convert_temperature(0.0, Celsius, Fahrenheit) - 32.0).abs() < f64::EPSILON);
        assert!((convert_temperature(212.0, Fahrenheit, Celsius) - 100.0).abs() < 1e-9);
        for x in [-40.0, 0.0, 21.5, 1e6] {
            assert!((convert_temperature(x, Celsius, Celsius) - x).abs() < f64::EPSILON);
            assert!((convert_temperature(x, Fahrenheit, Fahrenheit) - x).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_temperature_unit_parse() {
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("f".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert!("K".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_calculate_percentage() {
        assert_eq!(calculate_percentage(1.0, 3.0), 33);
        assert_eq!(calculate_percentage(1.0, 8.0), 13);
        assert_eq!(calculate_percentage(5.0, 0.0), 0);
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 10);
        assert!(id.starts_with('_'));
        assert!(id[1..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_id(), generate_id());
    }
}
