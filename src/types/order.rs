//! Raw order records and date range filters

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FoodtrackError, Result};

/// Date field aliases, highest priority first
const DATE_KEYS: &[&str] = &["orderDate", "order_date", "date"];

/// Cost field aliases, highest priority first
const COST_KEYS: &[&str] = &["totalCost", "total_cost"];

/// `paymentStatus` code for a paid/completed order
const PAID_STATUS: f64 = 1.0;

/// Restaurant name used when `resInfo.name` is missing
pub const UNKNOWN_RESTAURANT: &str = "Unknown";

/// A single order record exactly as the upstream API returned it.
///
/// The upstream schema is inconsistent across contexts, so the record is kept
/// as untyped JSON and every field is resolved on read. Serialization is
/// transparent: persisting and reloading keeps every upstream field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOrder(Value);

impl RawOrder {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// First non-null value among `keys`
    fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|v| !v.is_null())
    }

    /// Raw timestamp string (`orderDate` > `order_date` > `date`).
    /// Non-string values resolve to `None`.
    pub fn date_str(&self) -> Option<&str> {
        self.first_present(DATE_KEYS).and_then(Value::as_str)
    }

    /// Raw cost value (`totalCost` > `total_cost`)
    pub fn cost_value(&self) -> Option<&Value> {
        self.first_present(COST_KEYS)
    }

    /// Strict check: only a numeric `paymentStatus` equal to 1 counts as paid
    pub fn is_paid(&self) -> bool {
        self.0
            .get("paymentStatus")
            .and_then(Value::as_f64)
            .is_some_and(|status| status == PAID_STATUS)
    }

    /// Restaurant display name from `resInfo.name`, `"Unknown"` when absent or empty
    pub fn restaurant_name(&self) -> &str {
        self.0
            .get("resInfo")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_RESTAURANT)
    }
}

impl From<Value> for RawOrder {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Inclusive calendar date filter. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Unbounded range (every date passes)
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Parse `YYYY-MM-DD` inputs. Empty or whitespace-only strings mean "unset".
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    /// Range covering the last `days` days up to and including `today`.
    /// Errors when the start falls before the earliest representable date.
    pub fn last_days(days: u32, today: NaiveDate) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                FoodtrackError::Parse(format!("--last {} reaches before the earliest date", days))
            })?;
        Ok(Self {
            start: Some(start),
            end: Some(today),
        })
    }

    /// First included instant (00:00:00.000 of `start`)
    pub fn start_bound(&self) -> Option<NaiveDateTime> {
        self.start.map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Last included instant (23:59:59.999 of `end`)
    pub fn end_bound(&self) -> Option<NaiveDateTime> {
        self.end
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        if let Some(start) = self.start_bound() {
            if at < start {
                return false;
            }
        }
        if let Some(end) = self.end_bound() {
            if at > end {
                return false;
            }
        }
        true
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Human label, e.g. "2024-01-01 → 2024-03-31" or "All time"
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All time".to_string(),
            (Some(s), None) => format!("{} → now", s),
            (None, Some(e)) => format!("… → {}", e),
            (Some(s), Some(e)) => format!("{} → {}", s, e),
        }
    }
}

fn parse_bound(input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| FoodtrackError::Parse(format!("invalid date '{}': {}", s, e))),
    }
}

/// Quick-filter presets offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePreset {
    #[default]
    All,
    Last7,
    Last30,
    Last90,
    Last365,
}

impl RangePreset {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Last7 => "Last 7 days",
            Self::Last30 => "Last 30 days",
            Self::Last90 => "Last 90 days",
            Self::Last365 => "Last 365 days",
        }
    }

    pub fn days(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Last7 => Some(7),
            Self::Last30 => Some(30),
            Self::Last90 => Some(90),
            Self::Last365 => Some(365),
        }
    }

    /// Next preset (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Last7,
            Self::Last7 => Self::Last30,
            Self::Last30 => Self::Last90,
            Self::Last90 => Self::Last365,
            Self::Last365 => Self::All,
        }
    }

    pub fn range(self, today: NaiveDate) -> DateRange {
        match self.days() {
            None => DateRange::all(),
            Some(days) => DateRange::last_days(days, today)
                .unwrap_or_else(|_| DateRange::new(None, Some(today))),
        }
    }
}
