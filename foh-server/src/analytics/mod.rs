//! Sales analytics
//!
//! [`summarize`] is pure: the handler loads the orders of a date range and
//! the aggregation runs in memory.

pub mod summary;

pub use summary::{
    AnalyticsSummary, DailyRevenue, DateRange, ItemSales, MAX_RANGE_DAYS, TOP_N, TableActivity,
    summarize,
};
