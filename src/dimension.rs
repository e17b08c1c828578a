/// WMS time dimension handling
///
/// A layer advertises its available times as a list of values, each either a
/// single ISO-8601 instant or an interval `start/end/period`. These are expanded
/// into a sorted list of UTC times so a slider position can be snapped to the
/// closest time the server actually has.
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::TimestampError;
use crate::timefmt::hours_to_instant;

/// Upper bound on the number of instants one interval may expand to.
const MAX_EXPANDED: usize = 1_000_000;

/// Parse a single instant: RFC 3339 with offset, naive date-time, or bare date.
pub fn parse_instant(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.naive_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    bail!("Invalid time value: '{}'", text)
}

/// Parse an ISO-8601 duration made of weeks, days, hours, minutes and seconds.
///
/// Years and months have no fixed length and are rejected.
pub fn parse_period(text: &str) -> Result<Duration> {
    let body = text
        .trim()
        .strip_prefix('P')
        .with_context(|| format!("Period must start with 'P': '{}'", text))?;
    let (date_part, time_part) = match body.split_once('T') {
        Some((date_part, time_part)) => {
            if time_part.is_empty() {
                bail!("Empty time section in period: '{}'", text);
            }
            (date_part, time_part)
        }
        None => (body, ""),
    };
    if date_part.is_empty() && time_part.is_empty() {
        bail!("Empty period: '{}'", text);
    }

    let seconds = sum_components(date_part, &[('W', 7 * 86_400), ('D', 86_400)], text)?
        .checked_add(sum_components(time_part, &[('H', 3_600), ('M', 60), ('S', 1)], text)?)
        .with_context(|| format!("Period too large: '{}'", text))?;

    Duration::try_seconds(seconds).with_context(|| format!("Period too large: '{}'", text))
}

fn sum_components(part: &str, units: &[(char, i64)], original: &str) -> Result<i64> {
    let mut total: i64 = 0;
    let mut digits = String::new();
    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let Some(&(_, unit_seconds)) = units.iter().find(|(unit, _)| *unit == c) else {
            bail!("Unsupported period component '{}' in '{}'", c, original);
        };
        if digits.is_empty() {
            bail!("Missing number before '{}' in '{}'", c, original);
        }
        let count: i64 = digits
            .parse()
            .with_context(|| format!("Period too large: '{}'", original))?;
        total = count
            .checked_mul(unit_seconds)
            .and_then(|seconds| total.checked_add(seconds))
            .with_context(|| format!("Period too large: '{}'", original))?;
        digits.clear();
    }
    if !digits.is_empty() {
        bail!("Trailing number without unit in '{}'", original);
    }
    Ok(total)
}

/// Expand advertised time values into a sorted list of instants.
pub fn expand_time_values<S: AsRef<str>>(values: &[S]) -> Result<Vec<NaiveDateTime>> {
    let mut times = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        let parts: Vec<&str> = value.split('/').collect();
        match parts.as_slice() {
            [single] => times.push(parse_instant(single)?),
            [start, end, period] => expand_interval(start, end, period, &mut times)
                .with_context(|| format!("Invalid time interval: '{}'", value))?,
            _ => bail!("Expected an instant or start/end/period, got '{}'", value),
        }
    }
    times.sort();
    tracing::debug!(values = values.len(), times = times.len(), "expanded time dimension");
    Ok(times)
}

fn expand_interval(start: &str, end: &str, period: &str, out: &mut Vec<NaiveDateTime>) -> Result<()> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;
    let step = parse_period(period)?;
    if step <= Duration::zero() {
        bail!("Period must be positive: '{}'", period);
    }
    if end < start {
        bail!("Interval ends before it starts");
    }
    expand_between(start, end, step, out)
}

/// Push `start, start + step, ...` up to and including `end`.
fn expand_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
    out: &mut Vec<NaiveDateTime>,
) -> Result<()> {
    let mut current = start;
    let mut produced = 0usize;
    while current <= end {
        produced += 1;
        if produced > MAX_EXPANDED {
            bail!("Interval expands to more than {} times", MAX_EXPANDED);
        }
        out.push(current);
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(())
}

/// Time closest to `target`; ties go to the earlier entry.
pub fn nearest(times: &[NaiveDateTime], target: NaiveDateTime) -> Option<NaiveDateTime> {
    times
        .iter()
        .copied()
        .min_by_key(|time| (*time - target).abs())
}

/// Available time closest to a slider position given in slider hours.
pub fn snap_hours(
    times: &[NaiveDateTime],
    hours: i64,
) -> Result<Option<NaiveDateTime>, TimestampError> {
    let target = hours_to_instant(hours)?.naive_utc();
    let snapped = nearest(times, target);
    tracing::debug!(hours, %target, snapped = ?snapped, "snapped slider position");
    Ok(snapped)
}
