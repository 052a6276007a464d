use chrono::{DateTime, Duration, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Midnight UTC of the day `dt` falls on.
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(dt)
}

pub fn days_before(dt: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    dt - Duration::days(days)
}
