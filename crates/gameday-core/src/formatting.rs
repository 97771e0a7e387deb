use chrono::{NaiveDate, Weekday};

use crate::models::MonthDayKey;
use crate::time_utils::{month_name, weekday_name};

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Exact halves round to the even neighbour, so `1/32` gives `3.12`.
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use gameday_core::formatting::percentage;
///
/// assert!((percentage(1.0, 3.0, 2) - 33.33).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    round_half_even(raw * factor) / factor
}

fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        rounded
    }
}

/// Format a percentage with exactly two decimals and a `%` suffix.
///
/// # Examples
///
/// ```
/// use gameday_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(33.333), "33.33%");
/// assert_eq!(format_percentage(100.0), "100.00%");
/// ```
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

/// `"January 14"` for a month-day key.
pub fn format_month_day(key: MonthDayKey) -> String {
    match month_name(key.month()) {
        Some(name) => format!("{} {:02}", name, key.day()),
        None => key.to_string(),
    }
}

/// `"January 14"` for a full date (year dropped).
pub fn format_date_heading(date: NaiveDate) -> String {
    format_month_day(MonthDayKey::from_date(date))
}

/// Plural weekday, e.g. `"Mondays"`.
pub fn weekday_plural(day: Weekday) -> String {
    format!("{}s", weekday_name(day))
}

/// A nullable count, rendered as `-` when absent.
pub fn format_optional(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_to_two_places() {
        assert_eq!(percentage(2.0, 3.0, 2), 66.67);
        assert_eq!(percentage(1.0, 1.0, 2), 100.0);
        assert_eq!(percentage(0.0, 5.0, 2), 0.0);
    }

    #[test]
    fn test_percentage_exact_half_rounds_to_even() {
        assert_eq!(percentage(1.0, 32.0, 2), 3.12);
        assert_eq!(percentage(5.0, 32.0, 2), 15.62);
        assert_eq!(percentage(3.0, 32.0, 2), 9.38);
        assert_eq!(percentage(1.0, 8.0, 1), 12.5);
        assert_eq!(percentage(1.0, 16.0, 1), 6.2);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(3.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_format_percentage_always_two_decimals() {
        assert_eq!(format_percentage(50.0), "50.00%");
        assert_eq!(format_percentage(66.67), "66.67%");
    }

    #[test]
    fn test_format_month_day() {
        let key = MonthDayKey::new(1, 4).unwrap();
        assert_eq!(format_month_day(key), "January 04");
    }

    #[test]
    fn test_format_date_heading_drops_year() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        assert_eq!(format_date_heading(date), "March 14");
    }

    #[test]
    fn test_weekday_plural() {
        assert_eq!(weekday_plural(Weekday::Sat), "Saturdays");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(4)), "4");
        assert_eq!(format_optional(None), "-");
    }
}
