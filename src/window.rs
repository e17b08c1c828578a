/// Window parsing for slider date ranges
///
/// Parses window strings (e.g., '2025', '2025-03', '2025-W12', '2025-03-15')
/// into the inclusive date range the slider scale spans.
use anyhow::{anyhow, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Years the slider can sensibly show (the slider epoch is 1950).
const YEARS: std::ops::RangeInclusive<i32> = 1950..=2099;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Year,
    Month,
    Week,
    Day,
}

/// Represents a parsed window with its date range
#[derive(Debug, Clone, Serialize)]
pub struct WindowScope {
    /// Window key as provided by user (e.g., "2025", "2025-03", "2025-W12", "2025-03-15")
    pub key: String,
    pub kind: WindowKind,
    /// Start date (inclusive, UTC)
    pub from: NaiveDate,
    /// End date (inclusive, UTC)
    pub to: NaiveDate,
}

impl WindowScope {
    /// Parse a window string into a WindowScope
    ///
    /// Supported formats:
    /// - "2025" → entire year 2025
    /// - "2025-03" → March 2025
    /// - "2025-W12" → ISO week 12 of 2025
    /// - "2025-03-15" → specific day
    pub fn parse(window: &str) -> Result<Self> {
        let window = window.trim();

        // Try year: "YYYY"
        if let Ok(year) = window.parse::<i32>() {
            if YEARS.contains(&year) {
                let from = NaiveDate::from_ymd_opt(year, 1, 1)
                    .ok_or_else(|| anyhow!("Invalid year: {}", year))?;
                let to = NaiveDate::from_ymd_opt(year, 12, 31)
                    .ok_or_else(|| anyhow!("Invalid year: {}", year))?;
                return Ok(Self::new(window, WindowKind::Year, from, to));
            }
        }

        // Try month: "YYYY-MM"
        if let Some((year_str, month_str)) = window.split_once('-') {
            if let (Ok(year), Ok(month)) = (year_str.parse::<i32>(), month_str.parse::<u32>()) {
                if YEARS.contains(&year) && (1..=12).contains(&month) {
                    let from = NaiveDate::from_ymd_opt(year, month, 1)
                        .ok_or_else(|| anyhow!("Invalid month: {}-{:02}", year, month))?;
                    // Last day of month
                    let to = from
                        .checked_add_months(Months::new(1))
                        .and_then(|next| next.pred_opt())
                        .ok_or_else(|| anyhow!("Invalid month: {}-{:02}", year, month))?;
                    return Ok(Self::new(window, WindowKind::Month, from, to));
                }
            }
        }

        // Try week: "YYYY-WXX"
        if let Some((year_str, week_str)) = window.split_once("-W") {
            if let (Ok(year), Ok(week)) = (year_str.parse::<i32>(), week_str.parse::<u32>()) {
                if YEARS.contains(&year) {
                    let from = NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
                        .ok_or_else(|| anyhow!("Invalid week for year: {}-W{:02}", year, week))?;
                    let to = from + chrono::Duration::days(6);
                    return Ok(Self::new(window, WindowKind::Week, from, to));
                }
            }
        }

        // Try day: "YYYY-MM-DD"
        if let Ok(date) = NaiveDate::parse_from_str(window, "%Y-%m-%d") {
            if YEARS.contains(&date.year()) {
                return Ok(Self::new(window, WindowKind::Day, date, date));
            }
        }

        Err(anyhow!(
            "Invalid window format: '{}'. Expected: '2025', '2025-03', '2025-W12' or '2025-03-15' (years {}..={})",
            window,
            YEARS.start(),
            YEARS.end()
        ))
    }

    fn new(key: &str, kind: WindowKind, from: NaiveDate, to: NaiveDate) -> Self {
        WindowScope {
            key: key.to_string(),
            kind,
            from,
            to,
        }
    }

    /// Check if this window includes the given date
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
