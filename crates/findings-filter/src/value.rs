//! Scalar parsing for stored values and user literals.
//!
//! Both sides of a comparison go through the same parsers so a stored
//! `"85"` and a literal `"85"` always agree.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;

/// Instant represented as milliseconds since Unix epoch.
///
/// Dates are compared at day granularity through
/// [`Timestamp::start_of_day`], which discards the time of day.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use findings_filter::Timestamp;
///
/// let day = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
/// assert_eq!(Timestamp::start_of_day(day).as_millis(), 86_400_000);
/// assert!(Timestamp(1000) < Timestamp(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Midnight UTC at the start of the given calendar day.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Timestamp(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

/// Date layouts accepted besides RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses text as a calendar day.
///
/// The day is the one written in the text: `2024-03-01T23:59:00Z` and
/// `2024-03-01T00:30:00+05:00` are both March 1st.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

/// Parses a stored value as a calendar day.
///
/// Integers are read as epoch milliseconds (UTC).
pub fn date_of(value: &JsonValue) -> Option<NaiveDate> {
    match value {
        JsonValue::String(s) => parse_date(s),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

/// Parses text as a finite-or-infinite float; `NaN` is rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Parses a stored value as a float.
pub fn number_of(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

/// `"true"` and `"1"` are true; everything else is false.
///
/// The comparison is exact: no trimming and no case folding.
pub fn truthy_text(text: &str) -> bool {
    text == "true" || text == "1"
}

/// Truthiness of a stored value: `true`, the integer `1`, or text accepted
/// by [`truthy_text`].
pub fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_u64() == Some(1),
        JsonValue::String(s) => truthy_text(s),
        _ => false,
    }
}
