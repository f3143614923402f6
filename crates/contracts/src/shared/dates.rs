use chrono::{Datelike, Duration, NaiveDate};

/// Parse the date part of an ISO date or datetime ("2024-03-15", "2024-03-15T10:00:00")
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "YYYY-MM" key used for monthly grouping
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Inclusive range of the last `days` days ending today
pub fn last_days(days: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let span = days.max(1) as i64 - 1;
    (today - Duration::days(span), today)
}

/// First day of the month `back` months before the month of `date`
pub fn month_start_back(date: NaiveDate, back: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - back as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-15"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T14:02:26.123Z"), Some(d(2024, 3, 15)));
        assert_eq!(parse_date("15/03/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_last_days() {
        assert_eq!(last_days(7, d(2024, 3, 10)), (d(2024, 3, 4), d(2024, 3, 10)));
        assert_eq!(last_days(1, d(2024, 3, 10)), (d(2024, 3, 10), d(2024, 3, 10)));
        assert_eq!(last_days(30, d(2024, 3, 1)).0, d(2024, 2, 1));
        assert_eq!(last_days(30, d(2023, 3, 1)).0, d(2023, 1, 31));
    }

    #[test]
    fn test_month_helpers() {
        assert_eq!(month_key(d(2024, 3, 9)), "2024-03");
        assert!(same_month(d(2024, 3, 1), d(2024, 3, 31)));
        assert_eq!(month_start_back(d(2024, 2, 20), 0), d(2024, 2, 1));
        assert_eq!(month_start_back(d(2024, 2, 20), 3), d(2023, 11, 1));
    }
}
