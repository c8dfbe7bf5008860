use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::value::FieldValue;

const ZONED_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
];

// Slash dates are tried month-first, then day-first.
const NAIVE_DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%d %B %Y",
];

/// Normalizes any temporal representation to a timezone-naive calendar date.
/// Zoned instants keep their wall-clock date. Unparseable input yields `None`.
pub fn calendar_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Null | FieldValue::Number(_) => None,
        FieldValue::Date(date) => Some(*date),
        FieldValue::Timestamp(ts) => Some(ts.naive_local().date()),
        FieldValue::LocalTimestamp(ts) => Some(ts.date()),
        FieldValue::Text(raw) => parse_date_text(raw),
    }
}

pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.naive_local().date());
    }
    for format in ZONED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, format) {
            return Some(ts.naive_local().date());
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Calendar-date text used when comparing timestamp fields: the parsed date
/// when the value is a date, else the first ten characters of its text.
pub fn date_key(value: &FieldValue) -> String {
    if value.is_null() {
        return String::new();
    }
    if let Some(date) = calendar_date(value) {
        return date.format("%Y-%m-%d").to_string();
    }
    value.to_string().chars().take(10).collect()
}
