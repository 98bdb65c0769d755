//! Relative posting-date normalization

use chrono::{Duration, NaiveDate};

/// Output format of normalized dates
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Marker the site uses for listings older than a month
const STALE_MARKER: &str = "30+";

/// Converts the site's relative posting date into `dd-mm-yyyy`
///
/// - `"Today"` -> `today`
/// - `"Yesterday"` -> one day before `today`
/// - `"<N> days ago"` -> `N` days before `today`
/// - anything starting with `"30+"` -> `None` (the date is not recorded)
/// - anything else is returned unchanged
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use job_harvest::crawler::normalize_relative_date;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(normalize_relative_date("Yesterday", today).as_deref(), Some("09-03-2024"));
/// assert_eq!(normalize_relative_date("30+ days ago", today), None);
/// ```
pub fn normalize_relative_date(raw: &str, today: NaiveDate) -> Option<String> {
    let raw = raw.trim();

    if raw.starts_with(STALE_MARKER) {
        return None;
    }

    let days_back = match raw {
        "Today" => Some(0),
        "Yesterday" => Some(1),
        _ => parse_days_ago(raw),
    };

    let normalized = days_back
        .and_then(Duration::try_days)
        .and_then(|span| today.checked_sub_signed(span))
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string());

    Some(normalized)
}

fn parse_days_ago(raw: &str) -> Option<i64> {
    let count = raw
        .strip_suffix("days ago")
        .or_else(|| raw.strip_suffix("day ago"))?;
    count.trim().parse::<i64>().ok().filter(|days| *days >= 0)
}
