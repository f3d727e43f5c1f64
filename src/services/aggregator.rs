//! Aggregator service for computing spending metrics

use chrono::{Datelike, NaiveDateTime, Timelike};
use rayon::prelude::*;

use crate::services::normalizer::{coerce_amount, parse_order_date};
use crate::types::{DateRange, MetricsSnapshot, RawOrder};

/// An order that passed the paid + date-range filter, with fields resolved
#[derive(Debug, Clone)]
struct QualifiedOrder<'a> {
    placed_at: NaiveDateTime,
    amount: f64,
    restaurant: &'a str,
}

impl<'a> QualifiedOrder<'a> {
    /// Resolve and filter a raw order. Unparseable dates are dropped here.
    fn qualify(order: &'a RawOrder, range: &DateRange) -> Option<Self> {
        let placed_at = order.date_str().and_then(parse_order_date)?;
        if !range.contains(placed_at) || !order.is_paid() {
            return None;
        }
        Some(Self {
            placed_at,
            amount: coerce_amount(order.cost_value()),
            restaurant: order.restaurant_name(),
        })
    }
}

/// Aggregator for computing spending statistics
pub struct Aggregator;

impl Aggregator {
    /// Compute the metrics snapshot for paid orders inside `range`.
    ///
    /// Pure: reads `orders`, never mutates them, and returns the same snapshot
    /// for the same input regardless of thread scheduling.
    pub fn metrics(orders: &[RawOrder], range: &DateRange) -> MetricsSnapshot {
        if orders.is_empty() {
            return MetricsSnapshot::default();
        }

        // Resolve in parallel; collect keeps input order so float sums are stable
        let qualified: Vec<QualifiedOrder> = orders
            .par_iter()
            .filter_map(|order| QualifiedOrder::qualify(order, range))
            .collect();

        let mut snapshot = MetricsSnapshot::default();

        for order in &qualified {
            snapshot.total_spent += order.amount;

            let month_key = format!(
                "{}-{:02}",
                order.placed_at.year(),
                order.placed_at.month()
            );
            *snapshot.monthly_spend.entry(month_key).or_insert(0.0) += order.amount;

            snapshot.time_of_day[order.placed_at.hour() as usize] += 1;

            snapshot
                .restaurant_stats
                .entry(order.restaurant.to_string())
                .or_default()
                .add(order.amount);
        }

        snapshot.total_orders = qualified.len() as u64;
        snapshot.avg_order_value = average_order_value(snapshot.total_spent, snapshot.total_orders);
        snapshot
    }

    /// Count of orders whose date could not be parsed (diagnostics only)
    pub fn unparseable_dates(orders: &[RawOrder]) -> usize {
        orders
            .par_iter()
            .filter(|order| order.date_str().and_then(parse_order_date).is_none())
            .count()
    }
}

/// `total / count` rounded to 2 decimals, 0 for no orders
fn average_order_value(total: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    ((total / count as f64) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn order(date: &str, cost: serde_json::Value, status: i64, restaurant: Option<&str>) -> RawOrder {
        let mut value = json!({
            "orderDate": date,
            "totalCost": cost,
            "paymentStatus": status,
        });
        if let Some(name) = restaurant {
            value["resInfo"] = json!({ "name": name });
        }
        RawOrder::new(value)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========== metrics() basics ==========

    #[test]
    fn test_metrics_empty() {
        let result = Aggregator::metrics(&[], &DateRange::all());
        assert_eq!(result, MetricsSnapshot::default());
        assert_eq!(result.avg_order_value, 0.0);
    }

    #[test]
    fn test_metrics_reference_example() {
        let orders = vec![
            RawOrder::new(json!({
                "date": "March 1, 2024 10:15 AM",
                "totalCost": "100",
                "paymentStatus": 1,
                "resInfo": { "name": "A" }
            })),
            RawOrder::new(json!({
                "date": "March 2, 2024 11:00 PM",
                "totalCost": "200",
                "paymentStatus": 1,
                "resInfo": { "name": "A" }
            })),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());

        assert!((result.total_spent - 300.0).abs() < f64::EPSILON);
        assert_eq!(result.total_orders, 2);
        assert!((result.avg_order_value - 150.0).abs() < f64::EPSILON);
        assert_eq!(result.monthly_spend.len(), 1);
        assert!((result.monthly_spend["2024-03"] - 300.0).abs() < f64::EPSILON);
        assert_eq!(result.time_of_day[10], 1);
        assert_eq!(result.time_of_day[23], 1);
        assert_eq!(result.time_of_day.iter().sum::<u64>(), 2);
        let a = result.restaurant_stats["A"];
        assert_eq!(a.count, 2);
        assert!((a.amount - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_cost_aliases() {
        let orders = vec![
            RawOrder::new(json!({
                "orderDate": "March 1, 2024 at 10:15 AM",
                "total_cost": "₹1,234.50",
                "paymentStatus": 1
            })),
            RawOrder::new(json!({
                "orderDate": "March 1, 2024 at 11:15 AM",
                "totalCost": 500,
                "paymentStatus": 1
            })),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());
        assert!((result.total_spent - 1734.5).abs() < 1e-9);
    }

    // ========== filtering ==========

    #[test]
    fn test_metrics_unpaid_excluded_everywhere() {
        let orders = vec![
            order("March 1, 2024 10:15 AM", json!("100"), 1, Some("A")),
            order("March 5, 2024 08:00 PM", json!("999"), 0, Some("B")),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());

        assert_eq!(result.total_orders, 1);
        assert!((result.total_spent - 100.0).abs() < f64::EPSILON);
        assert!(!result.restaurant_stats.contains_key("B"));
        assert_eq!(result.time_of_day[20], 0);
        assert!((result.monthly_spend["2024-03"] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_missing_payment_status_excluded() {
        let orders = vec![RawOrder::new(json!({
            "orderDate": "March 1, 2024 10:15 AM",
            "totalCost": "100"
        }))];
        assert_eq!(Aggregator::metrics(&orders, &DateRange::all()).total_orders, 0);
    }

    #[test]
    fn test_metrics_unparseable_date_excluded() {
        let orders = vec![
            order("not a date", json!("100"), 1, Some("A")),
            order("March 1, 2024 10:15 AM", json!("50"), 1, Some("A")),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());

        assert_eq!(result.total_orders, 1);
        assert!((result.total_spent - 50.0).abs() < f64::EPSILON);
        assert_eq!(Aggregator::unparseable_dates(&orders), 1);
    }

    #[test]
    fn test_metrics_missing_date_and_cost() {
        let orders = vec![RawOrder::new(json!({ "paymentStatus": 1 }))];
        let result = Aggregator::metrics(&orders, &DateRange::all());
        assert_eq!(result.total_orders, 0);
    }

    #[test]
    fn test_metrics_missing_cost_counts_as_zero() {
        let orders = vec![RawOrder::new(json!({
            "orderDate": "March 1, 2024 10:15 AM",
            "paymentStatus": 1
        }))];
        let result = Aggregator::metrics(&orders, &DateRange::all());
        assert_eq!(result.total_orders, 1);
        assert_eq!(result.total_spent, 0.0);
        assert_eq!(result.restaurant_stats["Unknown"].count, 1);
    }

    #[test]
    fn test_metrics_end_of_day_inclusive() {
        let orders = vec![
            order("2024-03-31T23:59:59.999", json!(10), 1, Some("A")),
            order("2024-04-01T00:00:00.000", json!(20), 1, Some("A")),
        ];
        let range = DateRange::new(None, Some(date(2024, 3, 31)));

        let result = Aggregator::metrics(&orders, &range);

        assert_eq!(result.total_orders, 1);
        assert!((result.total_spent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_start_inclusive() {
        let orders = vec![
            order("2024-03-01T00:00:00", json!(10), 1, None),
            order("2024-02-29T23:59:59", json!(20), 1, None),
        ];
        let range = DateRange::new(Some(date(2024, 3, 1)), None);

        let result = Aggregator::metrics(&orders, &range);

        assert_eq!(result.total_orders, 1);
        assert!((result.total_spent - 10.0).abs() < f64::EPSILON);
    }

    // ========== grouping ==========

    #[test]
    fn test_metrics_months_and_hours() {
        let orders = vec![
            order("January 10, 2024 at 01:05 PM", json!("120"), 1, Some("A")),
            order("February 2, 2024 at 01:45 PM", json!("80"), 1, Some("B")),
            order("February 20, 2024 at 09:00 PM", json!("200"), 1, Some("B")),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());

        assert!((result.monthly_spend["2024-01"] - 120.0).abs() < f64::EPSILON);
        assert!((result.monthly_spend["2024-02"] - 280.0).abs() < f64::EPSILON);
        assert_eq!(result.time_of_day[13], 2);
        assert_eq!(result.time_of_day[21], 1);
        assert_eq!(result.restaurant_stats["B"].count, 2);
    }

    #[test]
    fn test_metrics_unknown_restaurant_grouped() {
        let orders = vec![
            order("March 1, 2024 10:15 AM", json!(10), 1, None),
            order("March 2, 2024 10:15 AM", json!(15), 1, None),
        ];

        let result = Aggregator::metrics(&orders, &DateRange::all());

        let unknown = result.restaurant_stats["Unknown"];
        assert_eq!(unknown.count, 2);
        assert!((unknown.amount - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_does_not_mutate_input() {
        let orders = vec![order("March 1, 2024 10:15 AM", json!("₹10"), 1, Some("A"))];
        let before = orders.clone();
        let _ = Aggregator::metrics(&orders, &DateRange::all());
        assert_eq!(orders, before);
    }

    // ========== average_order_value ==========

    #[test]
    fn test_average_rounds_to_two_decimals() {
        assert!((average_order_value(100.0, 3) - 33.33).abs() < f64::EPSILON);
        assert!((average_order_value(200.0, 3) - 66.67).abs() < f64::EPSILON);
        assert_eq!(average_order_value(50.0, 0), 0.0);
    }
}
