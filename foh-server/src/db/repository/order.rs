//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Order;
use shared::order::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const TABLE: &str = "order";

const ACTIVE_STATUSES: &[&str] = &["pending", "confirmed", "preparing", "ready", "served", "billed"];

/// Resolved list query (dates already converted to millis)
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub statuses: Vec<OrderStatus>,
    pub table_number: Option<i32>,
    pub created_from: Option<i64>,
    /// Exclusive upper bound
    pub created_to: Option<i64>,
    pub limit: Option<u32>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Newest first
    pub async fn find(&self, query: &OrderQuery) -> RepoResult<Vec<Order>> {
        let mut conditions = Vec::new();
        if !query.statuses.is_empty() {
            conditions.push("status IN $statuses");
        }
        if query.table_number.is_some() {
            conditions.push("table_number = $table_number");
        }
        if query.created_from.is_some() {
            conditions.push("created_at >= $from");
        }
        if query.created_to.is_some() {
            conditions.push("created_at < $to");
        }

        let mut sql = String::from("SELECT * FROM order");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let statuses: Vec<String> = query
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("statuses", statuses))
            .bind(("table_number", query.table_number))
            .bind(("from", query.created_from))
            .bind(("to", query.created_to))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn count_active_by_table(&self, table_number: i32) -> RepoResult<usize> {
        self.base
            .count(
                "SELECT count() FROM order WHERE table_number = $table_number AND status IN $statuses GROUP ALL",
                vec![
                    ("table_number", table_number.into()),
                    ("statuses", active_statuses().into()),
                ],
            )
            .await
    }

    /// Table numbers that currently carry at least one active order
    pub async fn active_table_numbers(&self) -> RepoResult<Vec<i32>> {
        let mut numbers: Vec<i32> = self
            .base
            .db()
            .query("SELECT VALUE table_number FROM order WHERE status IN $statuses")
            .bind(("statuses", active_statuses()))
            .await?
            .take(0)?;
        numbers.sort_unstable();
        numbers.dedup();
        Ok(numbers)
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Overwrite a stored order
    pub async fn save(&self, mut order: Order) -> RepoResult<Order> {
        let thing = order
            .id
            .take()
            .ok_or_else(|| RepoError::Validation("Order has no ID".to_string()))?;
        let id = thing.to_string();
        let updated: Option<Order> = self.base.db().update(thing).content(order).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}

fn active_statuses() -> Vec<String> {
    ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses_match_lifecycle() {
        let expected: Vec<&str> = OrderStatus::ALL
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.as_str())
            .collect();
        assert_eq!(ACTIVE_STATUSES, expected.as_slice());
    }
}
