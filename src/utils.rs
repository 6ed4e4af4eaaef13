use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Weekday names in the order the spending charts use (Sunday first).
pub const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Parses the leading numeric part of `raw`, the way a lenient float parser does:
/// `"12.5 XAF"` is `12.5`, `"abc"` is `None`. Non-finite results are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    let prefix = numeric_prefix(trimmed);
    prefix
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// [`parse_amount`] with the documented zero fallback.
pub fn safe_parse_amount(raw: &str) -> f64 {
    parse_amount(raw).unwrap_or(0.0)
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// `numerator / denominator * 100`, or `0.0` when the denominator is not positive.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds a currency value to the nearest whole unit for display.
pub fn round_currency(value: f64) -> i64 {
    value.round() as i64
}

pub fn format_currency(value: f64, label: &str) -> String {
    format!("{} {}", round_currency(value), label)
}

/// The Sunday that starts the week containing `date`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_day_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Whole days from `earlier` to `later`; negative when `earlier` is in the future.
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub fn weekday_short_name(day: Weekday) -> &'static str {
    &weekday_name(day)[..3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_lenient_prefix() {
        assert_eq!(parse_amount("1500"), Some(1500.0));
        assert_eq!(parse_amount("  42.5 "), Some(42.5));
        assert_eq!(parse_amount("12.5 XAF"), Some(12.5));
        assert_eq!(parse_amount("3e2kg"), Some(300.0));
        assert_eq!(parse_amount("7e"), Some(7.0));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_safe_parse_amount_zero_fallback() {
        assert_eq!(safe_parse_amount("not a number"), 0.0);
        assert_eq!(safe_parse_amount("250"), 250.0);
    }

    #[test]
    fn test_percent_of_guards_zero() {
        assert_eq!(percent_of(10.0, 0.0), 0.0);
        assert_eq!(percent_of(10.0, -5.0), 0.0);
        assert_eq!(percent_of(25.0, 100.0), 25.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_one_decimal(-19.96), -20.0);
        assert_eq!(round_one_decimal(33.333), 33.3);
        assert_eq!(round_currency(1234.5), 1235);
        assert_eq!(format_currency(999.6, "XAF"), "1000 XAF");
    }

    #[test]
    fn test_week_start_sunday() {
        // 2024-03-13 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        assert_eq!(
            week_start_sunday(wed),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );

        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(week_start_sunday(sunday), sunday);

        // Week crossing a year boundary
        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            week_start_sunday(new_year),
            NaiveDate::from_ymd_opt(2024, 12, 29).unwrap()
        );
    }

    #[test]
    fn test_calendar_starts() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(first_day_of_month(date), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(first_day_of_year(date), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_days_between() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(days_between(a, b), 30);
        assert_eq!(days_between(b, a), -30);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_short_name(Weekday::Wed), "Wed");
    }
}
