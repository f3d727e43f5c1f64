//! `foodtrack stats` and `foodtrack restaurants` reports

use std::fmt::Write as _;

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;

use foodtrack::services::{Aggregator, OrderStore, StoredOrders};
use foodtrack::tui::widgets::{format_currency, format_number, hour_label};
use foodtrack::types::{
    CategorySlice, DateRange, FoodtrackError, MetricsSnapshot, RankedRestaurant, Result,
    TOP_RESTAURANTS,
};

/// Date range selection shared by the report commands
#[derive(Args, Debug, Default)]
pub struct RangeArgs {
    /// First included day
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<String>,

    /// Last included day
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<String>,

    /// Only the last N days (up to today)
    #[arg(long, value_name = "DAYS", conflicts_with_all = ["from", "to"])]
    pub last: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RangeArgs {
    pub fn range(&self, today: NaiveDate) -> Result<DateRange> {
        match self.last {
            Some(days) => DateRange::last_days(days, today),
            None => DateRange::parse(self.from.as_deref(), self.to.as_deref()),
        }
    }
}

/// Everything a report prints, serialized as-is for `--json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub range: DateRange,
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
    pub top_restaurants: Vec<RankedRestaurant>,
    pub category_breakdown: Vec<CategorySlice>,
    pub monthly_trend: Vec<(String, f64)>,
    pub peak_hour: Option<usize>,
    /// Stored orders left out because their date could not be read
    pub undated_orders: usize,
}

impl MetricsReport {
    pub fn build(stored: &StoredOrders, range: DateRange, limit: usize) -> Self {
        let metrics = Aggregator::metrics(&stored.orders, &range);
        Self {
            range,
            last_synced: Some(stored.last_synced),
            top_restaurants: metrics.top_restaurants(limit),
            category_breakdown: metrics.category_breakdown(),
            monthly_trend: metrics.monthly_trend(),
            peak_hour: metrics.peak_hour(),
            undated_orders: Aggregator::unparseable_dates(&stored.orders),
            metrics,
        }
    }
}

/// Load the store or explain why there is nothing to report
pub fn load_orders(store: &OrderStore) -> Option<StoredOrders> {
    let (stored, warning) = store.load();
    if let Some(warning) = warning {
        eprintln!("Warning: {}", warning);
    }
    if stored.is_none() {
        eprintln!("No data found. Run `foodtrack sync` to fetch your order history.");
    }
    stored
}

pub fn run_stats(store: &OrderStore, args: &RangeArgs) -> Result<()> {
    let range = args.range(Local::now().date_naive())?;
    let Some(stored) = load_orders(store) else {
        return Ok(());
    };
    let report = MetricsReport::build(&stored, range, TOP_RESTAURANTS);
    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_stats(&report));
    }
    Ok(())
}

pub fn run_restaurants(store: &OrderStore, args: &RangeArgs, limit: usize) -> Result<()> {
    let range = args.range(Local::now().date_naive())?;
    let Some(stored) = load_orders(store) else {
        return Ok(());
    };
    let report = MetricsReport::build(&stored, range, limit);
    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_restaurants(&report));
    }
    Ok(())
}

fn to_json(report: &MetricsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| FoodtrackError::Parse(e.to_string()))
}

fn synced_label(last_synced: Option<DateTime<Utc>>) -> String {
    match last_synced {
        Some(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "never".to_string(),
    }
}

pub fn render_stats(report: &MetricsReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Range:          {}", report.range.label());
    let _ = writeln!(out, "Last synced:    {}", synced_label(report.last_synced));
    let _ = writeln!(out, "Total spent:    {}", format_currency(m.total_spent));
    let _ = writeln!(out, "Orders:         {}", format_number(m.total_orders));
    let _ = writeln!(out, "Average order:  {}", format_currency(m.avg_order_value));
    let peak = report
        .peak_hour
        .map(hour_label)
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Peak hour:      {}", peak);
    if report.undated_orders > 0 {
        let _ = writeln!(
            out,
            "Skipped:        {} orders with an unreadable date",
            format_number(report.undated_orders as u64)
        );
    }

    if !report.monthly_trend.is_empty() {
        let _ = writeln!(out, "\nMonthly spend");
        for (month, amount) in &report.monthly_trend {
            let _ = writeln!(out, "  {}  {:>12}", month, format_currency(*amount));
        }
    }
    out
}

pub fn render_restaurants(report: &MetricsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Range: {}\n", report.range.label());

    if report.top_restaurants.is_empty() {
        let _ = writeln!(out, "No paid orders in this range.");
        return out;
    }

    let _ = writeln!(out, "{:>3}  {:<32} {:>7} {:>12}", "#", "Restaurant", "Orders", "Spent");
    for (i, r) in report.top_restaurants.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<32} {:>7} {:>12}",
            i + 1,
            truncate(&r.name, 32),
            format_number(r.count),
            format_currency(r.amount)
        );
    }

    let total = report.metrics.total_spent;
    let _ = writeln!(out, "\nBreakdown");
    for slice in &report.category_breakdown {
        let percent = if total > 0.0 {
            slice.amount / total * 100.0
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "  {:<32} {:>12} {:>5.1}%",
            truncate(&slice.label, 32),
            format_currency(slice.amount),
            percent
        );
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
