//! Browser clock and date display helpers

use chrono::NaiveDate;

/// Today's date in the browser's local time zone
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

/// Milliseconds since epoch, for debouncing
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Format ISO date or datetime as dd/mm/yyyy
/// Example: "2024-03-15T14:02:26Z" -> "15/03/2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", day, month, year);
        }
    }
    date_str.to_string()
}

/// Format ISO datetime as dd/mm/yyyy HH:MM
pub fn format_datetime(datetime_str: &str) -> String {
    if let Some((date_part, time_part)) = datetime_str.split_once('T') {
        let hm: String = time_part.chars().take(5).collect();
        return format!("{} {}", format_date(date_part), hm);
    }
    format_date(datetime_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15/03/2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15/03/2024");
        assert_eq!(format_date("—"), "—");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-12-31T23:59:59Z"), "31/12/2024 23:59");
        assert_eq!(format_datetime("2024-12-31"), "31/12/2024");
    }
}
