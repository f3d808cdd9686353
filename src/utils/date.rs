use chrono::{NaiveDate, Utc};

/// Current UTC calendar date. The server clock is authoritative for all
/// "today" decisions; client-supplied dates are only checked against it.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// History map key for a calendar day (`YYYY-MM-DD`).
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// True when `earlier` is exactly the calendar day before `later`.
pub fn is_previous_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn day_key_is_iso() {
        assert_eq!(day_key(d("2024-05-01")), "2024-05-01");
        assert_eq!(day_key(d("2024-12-09")), "2024-12-09");
    }

    #[test]
    fn previous_day_handles_month_and_year_boundaries() {
        assert!(is_previous_day(d("2024-04-30"), d("2024-05-01")));
        assert!(is_previous_day(d("2023-12-31"), d("2024-01-01")));
        assert!(is_previous_day(d("2024-02-28"), d("2024-02-29")));
        assert!(!is_previous_day(d("2024-05-01"), d("2024-05-01")));
        assert!(!is_previous_day(d("2024-05-01"), d("2024-05-03")));
        assert!(!is_previous_day(d("2024-05-02"), d("2024-05-01")));
    }
}
