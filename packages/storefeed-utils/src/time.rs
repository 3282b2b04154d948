use chrono::{DateTime, NaiveDate, Utc};

/// Timestamps above this are taken to be milliseconds rather than seconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a store-reported update date.
///
/// Accepts RFC 3339 timestamps, plain `YYYY-MM-DD` dates and Unix timestamps
/// in seconds or milliseconds. Returns `None` for anything else.
pub fn parse_store_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    raw.parse::<i64>().ok().and_then(date_from_unix)
}

pub fn date_from_unix(timestamp: i64) -> Option<NaiveDate> {
    let seconds = if timestamp > MILLIS_THRESHOLD {
        timestamp / 1000
    } else {
        timestamp
    };
    DateTime::from_timestamp(seconds, 0).map(|datetime| datetime.date_naive())
}

/// Missing or unparsable dates fall back to `today`.
pub fn normalize_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(parse_store_date).unwrap_or(today)
}
