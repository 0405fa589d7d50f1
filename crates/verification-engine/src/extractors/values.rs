//! Value parsing for extracted and declared fields

use chrono::{DateTime, Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CURRENCY_PREFIX: Regex =
        Regex::new(r"^(?i)(?:rm|s\$|us\$|\$|usd|myr|sgd|£|€)\s*").unwrap();
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parses a money amount such as "RM 1,250,000.50" or "250000"
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let without_currency = CURRENCY_PREFIX.replace(trimmed, "");
    let digits: String = without_currency
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Parses a calendar date in one of the accepted layouts
///
/// Day-first layouts are assumed for slashed, dashed and dotted dates. Years
/// must have four digits.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .filter(|date| date.year() >= 1000)
}
