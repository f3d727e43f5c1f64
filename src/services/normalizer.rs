//! Order field normalization service
//!
//! Turns the loosely formatted timestamp and cost fields found in raw order
//! records into `NaiveDateTime` (local wall clock) and `f64` amounts.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

/// The first standalone " at " between date and time ("January 17, 2026 at 09:56 PM")
static AT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) at ").expect("valid regex"));

/// Date-time layouts tried in order (wall clock, no offset)
const DATETIME_FORMATS: &[&str] = &[
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%d %B %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as local midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y", "%m/%d/%Y"];

/// Parse an order timestamp.
///
/// The string is first tried with its " at " separator removed, then as-is.
/// Returns `None` when neither form parses.
///
/// # Examples
/// ```
/// use foodtrack::services::normalizer::parse_order_date;
///
/// let at = parse_order_date("January 17, 2026 at 09:56 PM").unwrap();
/// assert_eq!(at.to_string(), "2026-01-17 21:56:00");
/// assert!(parse_order_date("not a date").is_none());
/// ```
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = AT_SEPARATOR.replacen(raw, 1, " ");
    parse_datetime(cleaned.trim()).or_else(|| parse_datetime(raw.trim()))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    // Offset-carrying timestamps are converted to local wall clock
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Coerce a raw cost value into an amount.
///
/// Missing values count as `"0"`. The value is stringified, every character
/// other than ASCII digits and `.` is dropped, and the longest leading float
/// is parsed. Anything unparseable is `0.0`.
///
/// # Examples
/// ```
/// use foodtrack::services::normalizer::coerce_amount;
/// use serde_json::json;
///
/// assert_eq!(coerce_amount(Some(&json!("₹1,234.50"))), 1234.5);
/// assert_eq!(coerce_amount(Some(&json!(500))), 500.0);
/// assert_eq!(coerce_amount(None), 0.0);
/// ```
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let text = match value {
        None | Some(Value::Null) => return 0.0,
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Bool(_)) | Some(Value::Object(_)) => return 0.0,
    };

    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    parse_float_prefix(&digits)
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

/// Parse the longest `digits[.digits]` prefix; `None` without any digit
fn parse_float_prefix(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}
