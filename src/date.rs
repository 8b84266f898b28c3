//! Date normalization.
//!
//! Recognized spellings, tried in order:
//!
//! 1. `DD-MMM-YY`, `DD/MMM/YYYY`, `DD Month YYYY`: day, month name, year, separated
//!    by `-`, `/` or a space. Only the first three letters of the month count.
//! 2. `DD/MM/YYYY`, `DD-MM-YY`: numeric day-month-year.
//! 3. ISO-style and other unambiguous spellings understood by `chrono`.
//!
//! Two-digit years in forms 1 and 2 always mean 20YY. A string that fits form 1
//! or 2 but names no real calendar day is rejected outright rather than handed
//! to the fallback.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static NAMED_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/ ]([A-Za-z]{3,})[-/ ](\d{4}|\d{2})$").expect("valid regex")
});

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})$").expect("valid regex")
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const FALLBACK_DATE_FORMATS: [&str; 4] = [
    "%Y-%m-%d", // 2023-07-31
    "%Y/%m/%d", // 2023/07/31
    "%b %d, %Y", // Jul 31, 2023 / July 31, 2023
    "%b %d %Y", // Jul 31 2023
];

const FALLBACK_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a date written in any supported spelling.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use statement_normalizer::date::parse_date;
///
/// assert_eq!(parse_date("31-Jul-23")?, NaiveDate::from_ymd_opt(2023, 7, 31).unwrap());
/// assert!(parse_date("31/04/2023").is_err());
/// # Ok::<(), statement_normalizer::Error>(())
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    let invalid = || Error::InvalidDate(raw.to_string());

    if let Some(caps) = NAMED_MONTH.captures(s) {
        let month = month_number(&caps[2]).ok_or_else(invalid)?;
        return build_date(&caps[1], month, &caps[3]).ok_or_else(invalid);
    }

    if let Some(caps) = NUMERIC.captures(s) {
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        return build_date(&caps[1], month, &caps[3]).ok_or_else(invalid);
    }

    parse_generic(s).ok_or_else(invalid)
}

/// Parse a date and render it as `YYYY-MM-DD`.
pub fn normalize_date(raw: &str) -> Result<String> {
    parse_date(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

/// `from_ymd_opt` refuses impossible days, so 31 April never rolls into May.
fn build_date(day: &str, month: u32, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
