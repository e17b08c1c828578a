/// Conversion between slider hours (hours since 1950-01-01 UTC) and ISO-8601 instants.
///
/// The slider counts hours from 1950 while chrono counts milliseconds from the
/// Unix epoch, so every conversion goes through `EPOCH_DELTA_MILLIS`.
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseReason, TimestampError};

pub const MILLIS_PER_HOUR: i64 = 3_600_000;

/// 1970-01-01T00:00:00Z minus 1950-01-01T00:00:00Z, in milliseconds (7305 days).
pub const EPOCH_DELTA_MILLIS: i64 = 7_305 * 24 * MILLIS_PER_HOUR;

/// Format used by the WMS `time` request parameter.
pub const WMS_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.0Z";

/// First day counted by the slider.
pub fn slider_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).expect("1950-01-01 is a valid date")
}

/// Whole hours since 1950-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliderHours(pub i64);

impl SliderHours {
    /// Instant this slider position denotes.
    pub fn to_instant(self) -> Result<DateTime<Utc>, TimestampError> {
        hours_to_instant(self.0)
    }
}

impl From<i64> for SliderHours {
    fn from(hours: i64) -> Self {
        SliderHours(hours)
    }
}

impl fmt::Display for SliderHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SliderHours {
    type Err = TimestampError;

    /// Accepts an optionally signed base-10 integer with surrounding whitespace.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimestampError::parse(raw, ParseReason::Empty));
        }

        let unsigned = trimmed
            .strip_prefix(|c: char| c == '+' || c == '-')
            .unwrap_or(trimmed);
        if unsigned.is_empty() {
            return Err(TimestampError::parse(raw, ParseReason::NotNumeric));
        }

        if unsigned.bytes().all(|b| b.is_ascii_digit()) {
            // Only overflow can fail here
            return trimmed
                .parse::<i64>()
                .map(SliderHours)
                .map_err(|_| TimestampError::range(trimmed));
        }

        // A second sign is never numeric
        let float_like = !unsigned.starts_with(|c: char| c == '+' || c == '-')
            && unsigned
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
        if float_like && unsigned.parse::<f64>().is_ok() {
            return Err(TimestampError::parse(raw, ParseReason::Fractional));
        }

        Err(TimestampError::parse(raw, ParseReason::NotNumeric))
    }
}

/// Instant that lies `hours` hours after 1950-01-01T00:00:00Z.
///
/// Fails with `Range` when the instant overflows or falls outside the
/// four-digit years 0000..=9999 that ISO-8601 extended format can show.
pub fn hours_to_instant(hours: i64) -> Result<DateTime<Utc>, TimestampError> {
    let unix_millis = hours
        .checked_mul(MILLIS_PER_HOUR)
        .and_then(|millis| millis.checked_sub(EPOCH_DELTA_MILLIS))
        .ok_or_else(|| TimestampError::range(hours))?;

    match Utc.timestamp_millis_opt(unix_millis) {
        chrono::LocalResult::Single(datetime) if (0..=9999).contains(&datetime.year()) => {
            Ok(datetime)
        }
        _ => Err(TimestampError::range(hours)),
    }
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a raw slider label to an ISO-8601 timestamp string.
pub fn convert(raw_label: &str) -> Result<String, TimestampError> {
    let hours: SliderHours = raw_label.parse()?;
    convert_hours(hours.0)
}

/// Convert a slider position given as an integer.
pub fn convert_hours(hours: i64) -> Result<String, TimestampError> {
    let instant = hours_to_instant(hours)?;
    let formatted = format_iso(&instant);
    tracing::debug!(hours, %formatted, "converted slider hours");
    Ok(formatted)
}

/// Hours since 1950-01-01T00:00:00Z of an ISO-8601 instant.
///
/// Any UTC offset is accepted. The instant must fall on a whole hour.
pub fn hours_since_epoch(iso: &str) -> Result<i64, TimestampError> {
    let instant = DateTime::parse_from_rfc3339(iso.trim())
        .map_err(|_| TimestampError::parse(iso, ParseReason::NotInstant))?;

    if instant.timestamp_subsec_nanos() % 1_000_000 != 0 {
        return Err(TimestampError::parse(iso, ParseReason::Fractional));
    }

    let millis = instant.timestamp_millis() + EPOCH_DELTA_MILLIS;
    if millis % MILLIS_PER_HOUR != 0 {
        return Err(TimestampError::parse(iso, ParseReason::Fractional));
    }
    Ok(millis / MILLIS_PER_HOUR)
}

/// Format a naive UTC time the way the WMS `time` parameter expects it.
pub fn format_wms_time(time: &NaiveDateTime) -> String {
    time.format(WMS_TIME_FORMAT).to_string()
}
