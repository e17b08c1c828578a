/// Slider scale for a date window: day-granular slider values, range and
/// month/year tick marks.
///
/// Slider values are slider hours (see [`crate::timefmt`]) snapped to whole
/// days, so the slider steps one day at a time.
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dimension::nearest;
use crate::timefmt::slider_epoch;

/// One day, in slider hours.
pub const DAY_STEP: i64 = 24;

/// Number of tick marks spread over a window.
const MARK_COUNT: i64 = 12;

/// Slider value of a calendar day: whole days since 1950-01-01, in hours.
pub fn day_stamp(date: NaiveDate) -> i64 {
    (date - slider_epoch()).num_days() * DAY_STEP
}

/// Tick marks spanning one month before `from` to one month after `to`.
///
/// Twelve evenly spaced days are labelled with the month name while they stay
/// in the running year (starting at `first_year`), and with the year when it
/// changes. Marks landing on the same day keep the latest label.
pub fn time_marks(from: NaiveDate, to: NaiveDate, first_year: i32) -> Result<IndexMap<i64, String>> {
    let start = from
        .checked_sub_months(Months::new(1))
        .with_context(|| format!("No month before {}", from))?;
    let end = to
        .checked_add_months(Months::new(1))
        .with_context(|| format!("No month after {}", to))?;
    let span_days = (end - start).num_days();

    let mut running_year = first_year;
    let mut marks = IndexMap::new();
    for i in 0..MARK_COUNT {
        let day = start + Duration::days(span_days * i / (MARK_COUNT - 1));
        let label = if day.year() == running_year {
            day.format("%B").to_string()
        } else {
            running_year = day.year();
            day.format("%Y").to_string()
        };
        marks.insert(day_stamp(day), label);
    }
    Ok(marks)
}

/// Date range with missing ends filled in as one month either side of `today`.
pub fn date_range_around(
    today: NaiveDate,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate)> {
    let from = match from {
        Some(from) => from,
        None => today
            .checked_sub_months(Months::new(1))
            .with_context(|| format!("No month before {}", today))?,
    };
    let to = match to {
        Some(to) => to,
        None => today
            .checked_add_months(Months::new(1))
            .with_context(|| format!("No month after {}", today))?,
    };
    Ok((from, to))
}

/// Everything a slider needs to cover a window.
#[derive(Debug, Clone, Serialize)]
pub struct SliderScale {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    /// Initial position
    pub value: i64,
    pub marks: IndexMap<i64, String>,
}

impl SliderScale {
    /// Build the scale for `from..=to`.
    ///
    /// The initial position is the day of the available time closest to
    /// `current`, or `current` itself when no times are given, clamped into range.
    pub fn for_window(
        from: NaiveDate,
        to: NaiveDate,
        current: NaiveDate,
        available: &[NaiveDateTime],
    ) -> Result<Self> {
        if from > to {
            bail!("Window start {} is after its end {}", from, to);
        }

        let start_day = nearest(available, current.and_time(chrono::NaiveTime::MIN))
            .map(|time| time.date())
            .unwrap_or(current);

        let min = day_stamp(from);
        let max = day_stamp(to);
        let scale = SliderScale {
            min,
            max,
            step: DAY_STEP,
            value: day_stamp(start_day).clamp(min, max),
            marks: time_marks(from, to, from.year())?,
        };
        tracing::debug!(min, max, value = scale.value, marks = scale.marks.len(), "built slider scale");
        Ok(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_stamp() {
        assert_eq!(day_stamp(date(1950, 1, 1)), 0);
        assert_eq!(day_stamp(date(1950, 1, 2)), 24);
        assert_eq!(day_stamp(date(1987, 7, 3)), 328_728);
        assert_eq!(day_stamp(date(1949, 12, 31)), -24);
    }

    #[test]
    fn test_day_stamp_agrees_with_tooltip() {
        let stamp = day_stamp(date(2024, 2, 29));
        assert_eq!(
            crate::timefmt::convert_hours(stamp).unwrap(),
            "2024-02-29T00:00:00.000Z"
        );
    }

    #[test]
    fn test_time_marks_for_year() {
        let marks = time_marks(date(2024, 1, 1), date(2024, 12, 31), 2024).unwrap();
        assert_eq!(marks.len(), 12);

        let entries: Vec<(i64, &str)> = marks.iter().map(|(k, v)| (*k, v.as_str())).collect();
        assert_eq!(entries[0], (day_stamp(date(2023, 12, 1)), "2023"));
        assert_eq!(entries[1], (day_stamp(date(2024, 1, 8)), "2024"));
        assert_eq!(entries[2], (day_stamp(date(2024, 2, 16)), "February"));
        assert_eq!(entries[3], (day_stamp(date(2024, 3, 26)), "March"));
        assert_eq!(entries[11], (day_stamp(date(2025, 1, 31)), "2025"));
    }

    #[test]
    fn test_time_marks_clamp_month_end() {
        // 2024-03-31 minus one month is 2024-02-29
        let marks = time_marks(date(2024, 3, 31), date(2024, 3, 31), 2024).unwrap();
        let first = marks.keys().next().copied().unwrap();
        assert_eq!(first, day_stamp(date(2024, 2, 29)));
    }

    #[test]
    fn test_time_marks_single_day_uses_month_names() {
        let marks = time_marks(date(2023, 2, 1), date(2023, 2, 1), 2023).unwrap();
        assert_eq!(marks.len(), 12);
        assert_eq!(marks.first().map(|(_, v)| v.as_str()), Some("January"));
        assert_eq!(marks.last().map(|(_, v)| v.as_str()), Some("March"));
        assert!(marks.values().all(|label| label != "2023"));
    }

    #[test]
    fn test_scale_for_window() {
        let scale =
            SliderScale::for_window(date(2024, 1, 1), date(2024, 12, 31), date(2030, 1, 1), &[]).unwrap();
        assert_eq!(scale.min, day_stamp(date(2024, 1, 1)));
        assert_eq!(scale.max, day_stamp(date(2024, 12, 31)));
        assert_eq!(scale.step, 24);
        assert_eq!(scale.value, scale.max);
        assert_eq!(scale.marks.len(), 12);
    }

    #[test]
    fn test_scale_starts_at_nearest_available_time() {
        let available = vec![
            date(2030, 3, 10).and_hms_opt(12, 0, 0).unwrap(),
            date(2030, 6, 1).and_hms_opt(0, 0, 0).unwrap(),
        ];
        let scale =
            SliderScale::for_window(date(2030, 1, 1), date(2030, 12, 31), date(2026, 10, 16), &available)
                .unwrap();
        assert_eq!(scale.value, day_stamp(date(2030, 3, 10)));
        assert!(scale.value > scale.min);

        let scale =
            SliderScale::for_window(date(2030, 1, 1), date(2030, 12, 31), date(2030, 5, 30), &available)
                .unwrap();
        assert_eq!(scale.value, day_stamp(date(2030, 6, 1)));
    }

    #[test]
    fn test_scale_without_available_times_clamps_current() {
        let scale =
            SliderScale::for_window(date(2030, 1, 1), date(2030, 12, 31), date(2026, 10, 16), &[])
                .unwrap();
        assert_eq!(scale.value, scale.min);
    }

    #[test]
    fn test_date_range_around_defaults() {
        let today = date(2026, 3, 31);
        assert_eq!(
            date_range_around(today, None, None).unwrap(),
            (date(2026, 2, 28), date(2026, 4, 30))
        );
        assert_eq!(
            date_range_around(today, Some(date(2025, 1, 1)), None).unwrap(),
            (date(2025, 1, 1), date(2026, 4, 30))
        );
        assert_eq!(
            date_range_around(today, None, Some(date(2026, 12, 31))).unwrap(),
            (date(2026, 2, 28), date(2026, 12, 31))
        );
    }

    #[test]
    fn test_scale_rejects_inverted_window() {
        assert!(SliderScale::for_window(date(2024, 2, 1), date(2024, 1, 1), date(2024, 1, 1), &[]).is_err());
    }

    #[test]
    fn test_scale_serializes_marks_as_object() {
        let scale =
            SliderScale::for_window(date(1950, 2, 1), date(1950, 2, 1), date(1950, 2, 1), &[]).unwrap();
        let json = serde_json::to_value(&scale).unwrap();
        assert_eq!(json["min"], 744);
        assert_eq!(json["value"], 744);
        assert!(json["marks"].is_object());
        assert_eq!(json["marks"]["0"], "January");
    }
}
