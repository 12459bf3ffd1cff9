use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Reads the calendar date out of a stored record date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]` and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// `YYYY-MM` label for a month.
pub fn month_label(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

/// The `count` months ending with `as_of`'s month, oldest first.
pub fn trailing_months(as_of: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    (0..count)
        .rev()
        .map(|back| {
            let mut year = as_of.year();
            let mut month = as_of.month() as i32 - back as i32;
            while month <= 0 {
                month += 12;
                year -= 1;
            }
            (year, month as u32)
        })
        .collect()
}
