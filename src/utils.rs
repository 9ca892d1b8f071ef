/// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// First day served by the APOD archive.
pub const APOD_EPOCH: (i32, u32, u32) = (1995, 6, 16);

/// Pick the first non-empty string from a list of optional candidates
pub fn pick_str<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().find(|s| !s.is_empty()).copied()
}

/// True if the string is a well-formed YYYY-MM-DD calendar date
pub fn is_date_format(s: &str) -> bool {
    DATE_RE.is_match(s)
}

/// Validate an APOD date parameter.
///
/// Returns the parsed date only when well-formed and within
/// [1995-06-16, today]; anything else is treated as absent.
pub fn validate_apod_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    if !DATE_RE.is_match(s) {
        return None;
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let (y, m, d) = APOD_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    if date < epoch || date > today {
        return None;
    }
    Some(date)
}

/// Parse an event timestamp into epoch milliseconds.
///
/// DONKI serves minute-precision timestamps ("2024-05-10T16:36Z"); EPIC uses
/// "YYYY-MM-DD HH:MM:SS". Unparsable input yields 0 so those events sort
/// last in descending time order.
pub fn event_time_millis(s: &str) -> i64 {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return dt.timestamp_millis();
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ") {
        return Utc.from_utc_datetime(&ndt).timestamp_millis();
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&ndt).timestamp_millis();
    }
    0
}

/// Rewrite an http:// URL to https://, leaving anything else untouched
pub fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Format a distance with thousands separators, rounded to whole units
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0 {
        format!("-{out}")
    } else {
        out
    }
}
