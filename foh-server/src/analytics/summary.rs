//! Order aggregation

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::order::money::{line_total, to_decimal, to_f64};
use shared::order::OrderStatus;

use crate::db::models::Order;
use crate::utils::time::millis_to_date;

/// Length of the top item / table lists
pub const TOP_N: usize = 10;

/// Longest accepted reporting window
pub const MAX_RANGE_DAYS: i64 = 366;

/// Inclusive UTC date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub orders: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSales {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableActivity {
    pub table_number: i32,
    pub orders: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub range: DateRange,
    pub total_orders: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    /// Σ totals of completed orders
    pub revenue: f64,
    pub average_order_value: f64,
    /// One entry per day of the range, empty days included
    pub revenue_by_day: Vec<DailyRevenue>,
    /// By quantity sold on completed orders
    pub top_items: Vec<ItemSales>,
    /// By number of non-cancelled orders
    pub top_tables: Vec<TableActivity>,
}

#[derive(Default)]
struct ItemAcc {
    name: String,
    quantity: i64,
    revenue: Decimal,
}

#[derive(Default)]
struct TableAcc {
    orders: usize,
    revenue: Decimal,
}

/// Aggregate the orders created inside `range`; others are ignored.
pub fn summarize(orders: &[Order], range: DateRange) -> AnalyticsSummary {
    let mut by_status: BTreeMap<OrderStatus, usize> = BTreeMap::new();
    let mut daily: BTreeMap<NaiveDate, (usize, Decimal)> =
        range.days().map(|d| (d, (0, Decimal::ZERO))).collect();
    let mut items: HashMap<String, ItemAcc> = HashMap::new();
    let mut tables: HashMap<i32, TableAcc> = HashMap::new();
    let mut revenue = Decimal::ZERO;
    let mut total_orders = 0;

    for order in orders {
        let date = millis_to_date(order.created_at);
        if !range.contains(date) {
            continue;
        }
        total_orders += 1;
        *by_status.entry(order.status).or_default() += 1;

        if order.status != OrderStatus::Cancelled {
            let acc = tables.entry(order.table_number).or_default();
            acc.orders += 1;
            if order.status == OrderStatus::Completed {
                acc.revenue += to_decimal(order.total);
            }
        }

        if order.status != OrderStatus::Completed {
            continue;
        }

        let total = to_decimal(order.total);
        revenue += total;
        let day = daily.entry(date).or_default();
        day.0 += 1;
        day.1 += total;

        for line in &order.items {
            let acc = items.entry(line.menu_item_id.clone()).or_default();
            if acc.name.is_empty() {
                acc.name = line.name.clone();
            }
            acc.quantity += i64::from(line.quantity);
            acc.revenue += line_total(line);
        }
    }

    let completed_orders = by_status.get(&OrderStatus::Completed).copied().unwrap_or(0);
    let cancelled_orders = by_status.get(&OrderStatus::Cancelled).copied().unwrap_or(0);
    let average_order_value = if completed_orders == 0 {
        0.0
    } else {
        to_f64(revenue / Decimal::from(completed_orders))
    };

    let mut top_items: Vec<ItemSales> = items
        .into_iter()
        .map(|(menu_item_id, acc)| ItemSales {
            menu_item_id,
            name: acc.name,
            quantity: acc.quantity,
            revenue: to_f64(acc.revenue),
        })
        .collect();
    top_items.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.name.cmp(&b.name))
    });
    top_items.truncate(TOP_N);

    let mut top_tables: Vec<TableActivity> = tables
        .into_iter()
        .map(|(table_number, acc)| TableActivity {
            table_number,
            orders: acc.orders,
            revenue: to_f64(acc.revenue),
        })
        .collect();
    top_tables.sort_by(|a, b| {
        b.orders
            .cmp(&a.orders)
            .then_with(|| a.table_number.cmp(&b.table_number))
    });
    top_tables.truncate(TOP_N);

    AnalyticsSummary {
        range,
        total_orders,
        by_status,
        completed_orders,
        cancelled_orders,
        revenue: to_f64(revenue),
        average_order_value,
        revenue_by_day: daily
            .into_iter()
            .map(|(date, (orders, revenue))| DailyRevenue {
                date,
                orders,
                revenue: to_f64(revenue),
            })
            .collect(),
        top_items,
        top_tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::day_start_millis;
    use shared::order::OrderItem;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn line(id: &str, price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            menu_item_id: format!("menu_item:{id}"),
            name: id.to_uppercase(),
            price,
            quantity,
            note: None,
        }
    }

    fn order(day: &str, table: i32, status: OrderStatus, items: Vec<OrderItem>) -> Order {
        let created_at = day_start_millis(date(day)) + 3_600_000;
        Order {
            id: None,
            table_number: table,
            customer_name: "Guest".into(),
            total: shared::order::compute_total(&items),
            items,
            status,
            notes: None,
            placed_by: "staff:w".into(),
            confirmed_by: None,
            billed_by: None,
            completed_by: None,
            cancelled_by: None,
            cancel_reason: None,
            history: vec![],
            version: 1,
            created_at,
            updated_at: created_at,
            closed_at: None,
        }
    }

    fn range(from: &str, to: &str) -> DateRange {
        DateRange {
            from: date(from),
            to: date(to),
        }
    }

    #[test]
    fn test_revenue_counts_completed_only() {
        let orders = vec![
            order("2024-05-01", 1, OrderStatus::Completed, vec![line("dal", 7.5, 2)]),
            order("2024-05-01", 2, OrderStatus::Completed, vec![line("naan", 2.25, 4)]),
            order("2024-05-02", 1, OrderStatus::Cancelled, vec![line("dal", 7.5, 9)]),
            order("2024-05-02", 3, OrderStatus::Served, vec![line("dal", 7.5, 1)]),
        ];
        let s = summarize(&orders, range("2024-05-01", "2024-05-03"));

        assert_eq!(s.total_orders, 4);
        assert_eq!(s.completed_orders, 2);
        assert_eq!(s.cancelled_orders, 1);
        assert_eq!(s.by_status.get(&OrderStatus::Served), Some(&1));
        assert_eq!(s.revenue, 24.0);
        assert_eq!(s.average_order_value, 12.0);
    }

    #[test]
    fn test_revenue_by_day_fills_gaps() {
        let orders = vec![order(
            "2024-05-03",
            1,
            OrderStatus::Completed,
            vec![line("dal", 7.5, 1)],
        )];
        let s = summarize(&orders, range("2024-05-01", "2024-05-03"));

        let days: Vec<(NaiveDate, f64)> =
            s.revenue_by_day.iter().map(|d| (d.date, d.revenue)).collect();
        assert_eq!(
            days,
            vec![
                (date("2024-05-01"), 0.0),
                (date("2024-05-02"), 0.0),
                (date("2024-05-03"), 7.5),
            ]
        );
    }

    #[test]
    fn test_top_items_and_tables() {
        let orders = vec![
            order(
                "2024-05-01",
                5,
                OrderStatus::Completed,
                vec![line("dal", 7.5, 2), line("naan", 2.25, 5)],
            ),
            order("2024-05-01", 5, OrderStatus::Completed, vec![line("dal", 7.5, 1)]),
            order("2024-05-01", 2, OrderStatus::Pending, vec![line("lassi", 3.0, 8)]),
        ];
        let s = summarize(&orders, range("2024-05-01", "2024-05-01"));

        assert_eq!(s.top_items[0].name, "NAAN");
        assert_eq!(s.top_items[0].quantity, 5);
        assert_eq!(s.top_items[1].quantity, 3);
        assert_eq!(s.top_items[1].revenue, 22.5);
        // pending orders sell nothing yet
        assert!(s.top_items.iter().all(|i| i.name != "LASSI"));

        assert_eq!(s.top_tables[0].table_number, 5);
        assert_eq!(s.top_tables[0].orders, 2);
        // 15 + 11.25 + 7.5
        assert_eq!(s.top_tables[0].revenue, 33.75);
        assert_eq!(s.top_tables[1].table_number, 2);
    }

    #[test]
    fn test_orders_outside_range_ignored() {
        let orders = vec![order(
            "2024-04-30",
            1,
            OrderStatus::Completed,
            vec![line("dal", 7.5, 1)],
        )];
        let s = summarize(&orders, range("2024-05-01", "2024-05-01"));
        assert_eq!(s.total_orders, 0);
        assert_eq!(s.revenue, 0.0);
        assert_eq!(s.average_order_value, 0.0);
        assert_eq!(s.revenue_by_day.len(), 1);
    }
}
