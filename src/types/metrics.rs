//! Spending metrics derived from paid orders

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Rows in the ranked restaurant list
pub const TOP_RESTAURANTS: usize = 10;

/// Named slices in the category breakdown before the rest collapse into "Others"
pub const BREAKDOWN_SLICES: usize = 5;

/// Label of the synthesized remainder slice
pub const OTHERS_LABEL: &str = "Others";

/// Per-restaurant order count and spend
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RestaurantStat {
    pub count: u64,
    pub amount: f64,
}

impl RestaurantStat {
    pub fn add(&mut self, amount: f64) {
        self.count = self.count.saturating_add(1);
        self.amount += amount;
    }
}

/// Restaurant row after sorting by spend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub name: String,
    pub count: u64,
    pub amount: f64,
}

/// One slice of the category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub amount: f64,
}

/// Aggregate statistics for one date range. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_spent: f64,
    pub total_orders: u64,
    /// Rounded to 2 decimals, 0 when there are no orders
    pub avg_order_value: f64,
    /// "YYYY-MM" → spend. Ordered map, so iteration is chronological.
    pub monthly_spend: BTreeMap<String, f64>,
    /// Order count per hour of day (index 0–23)
    pub time_of_day: [u64; 24],
    pub restaurant_stats: HashMap<String, RestaurantStat>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            total_spent: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
            monthly_spend: BTreeMap::new(),
            time_of_day: [0; 24],
            restaurant_stats: HashMap::new(),
        }
    }
}

impl MetricsSnapshot {
    /// All restaurants sorted by amount descending (name ascending on ties, NaN-safe)
    pub fn ranked_restaurants(&self) -> Vec<RankedRestaurant> {
        let mut ranked: Vec<RankedRestaurant> = self
            .restaurant_stats
            .iter()
            .map(|(name, stat)| RankedRestaurant {
                name: name.clone(),
                count: stat.count,
                amount: stat.amount,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked
    }

    /// Top `limit` restaurants by spend
    pub fn top_restaurants(&self, limit: usize) -> Vec<RankedRestaurant> {
        let mut ranked = self.ranked_restaurants();
        ranked.truncate(limit);
        ranked
    }

    /// Top five restaurants plus an "Others" slice holding the remainder.
    /// "Others" is only present when the remainder is positive.
    pub fn category_breakdown(&self) -> Vec<CategorySlice> {
        let ranked = self.ranked_restaurants();
        let others: f64 = ranked
            .iter()
            .skip(BREAKDOWN_SLICES)
            .map(|r| r.amount)
            .sum();

        let mut slices: Vec<CategorySlice> = ranked
            .into_iter()
            .take(BREAKDOWN_SLICES)
            .map(|r| CategorySlice {
                label: r.name,
                amount: r.amount,
            })
            .collect();

        if others > 0.0 {
            slices.push(CategorySlice {
                label: OTHERS_LABEL.to_string(),
                amount: others,
            });
        }
        slices
    }

    /// Monthly spend in chronological order
    pub fn monthly_trend(&self) -> Vec<(String, f64)> {
        self.monthly_spend
            .iter()
            .map(|(month, amount)| (month.clone(), *amount))
            .collect()
    }

    /// Hour with the most orders (earliest wins ties), `None` when empty
    pub fn peak_hour(&self) -> Option<usize> {
        let max = *self.time_of_day.iter().max()?;
        if max == 0 {
            return None;
        }
        self.time_of_day.iter().position(|&count| count == max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(restaurants: &[(&str, u64, f64)]) -> MetricsSnapshot {
        let mut snapshot = MetricsSnapshot::default();
        for (name, count, amount) in restaurants {
            snapshot.restaurant_stats.insert(
                name.to_string(),
                RestaurantStat {
                    count: *count,
                    amount: *amount,
                },
            );
        }
        snapshot
    }

    #[test]
    fn test_ranked_restaurants_sorted_by_amount_descending() {
        let snapshot = snapshot_with(&[("A", 1, 100.0), ("B", 3, 900.0), ("C", 2, 450.0)]);
        let names: Vec<String> = snapshot
            .ranked_restaurants()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_ranked_restaurants_ties_break_by_name() {
        let snapshot = snapshot_with(&[("Zaika", 1, 100.0), ("Anand", 1, 100.0)]);
        let ranked = snapshot.ranked_restaurants();
        assert_eq!(ranked[0].name, "Anand");
        assert_eq!(ranked[1].name, "Zaika");
    }

    #[test]
    fn test_top_restaurants_truncates() {
        let names: Vec<String> = (0..15).map(|i| format!("R{:02}", i)).collect();
        let rows: Vec<(&str, u64, f64)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), 1, (i + 1) as f64 * 10.0))
            .collect();
        let snapshot = snapshot_with(&rows);

        let top = snapshot.top_restaurants(TOP_RESTAURANTS);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].name, "R14");
    }

    #[test]
    fn test_category_breakdown_others_bucket() {
        let snapshot = snapshot_with(&[
            ("A", 1, 700.0),
            ("B", 1, 600.0),
            ("C", 1, 500.0),
            ("D", 1, 400.0),
            ("E", 1, 300.0),
            ("F", 1, 200.0),
            ("G", 1, 100.0),
        ]);

        let slices = snapshot.category_breakdown();
        assert_eq!(slices.len(), 6);
        assert_eq!(slices[5].label, "Others");
        assert!((slices[5].amount - 300.0).abs() < f64::EPSILON);
        assert_eq!(slices[0].label, "A");
    }

    #[test]
    fn test_category_breakdown_no_others_when_five_or_fewer() {
        let snapshot = snapshot_with(&[("A", 1, 10.0), ("B", 1, 20.0)]);
        let slices = snapshot.category_breakdown();
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.label != OTHERS_LABEL));
    }

    #[test]
    fn test_category_breakdown_skips_zero_remainder() {
        let snapshot = snapshot_with(&[
            ("A", 1, 60.0),
            ("B", 1, 50.0),
            ("C", 1, 40.0),
            ("D", 1, 30.0),
            ("E", 1, 20.0),
            ("F", 1, 0.0),
        ]);
        assert_eq!(snapshot.category_breakdown().len(), 5);
    }

    #[test]
    fn test_monthly_trend_chronological() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.monthly_spend.insert("2024-03".into(), 30.0);
        snapshot.monthly_spend.insert("2023-12".into(), 10.0);
        snapshot.monthly_spend.insert("2024-01".into(), 20.0);

        let months: Vec<String> = snapshot.monthly_trend().into_iter().map(|(m, _)| m).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-03"]);
    }

    #[test]
    fn test_peak_hour() {
        let mut snapshot = MetricsSnapshot::default();
        assert_eq!(snapshot.peak_hour(), None);

        snapshot.time_of_day[13] = 4;
        snapshot.time_of_day[21] = 4;
        snapshot.time_of_day[9] = 1;
        assert_eq!(snapshot.peak_hour(), Some(13));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let value = serde_json::to_value(MetricsSnapshot::default()).unwrap();
        assert!(value.get("totalSpent").is_some());
        assert!(value.get("avgOrderValue").is_some());
        assert_eq!(value["timeOfDay"].as_array().unwrap().len(), 24);
    }
}
