//! Order service
//!
//! Order writes and the table occupancy they imply. Each write takes the
//! table's lock, re-reads the order, applies a [`rules`](super::rules)
//! mutation, persists both documents and publishes them before releasing
//! the lock, so sync versions follow commit order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared::models::TableStatus;
use shared::order::{
    OrderStatus, PlaceOrderRequest, ReplaceItemsRequest, TransitionRequest,
};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::rules::{apply_items, apply_transition, check_version, new_order, resolve_items};
use super::{OrderError, TableLocks};
use crate::auth::CurrentUser;
use crate::auth::permissions::{ORDERS_EDIT, ORDERS_PLACE, transition_permission};
use crate::db::models::{DiningTable, MenuItem, Order, OrderFilter};
use crate::db::repository::order::OrderQuery;
use crate::db::repository::{DiningTableRepository, MenuItemRepository, OrderRepository};
use crate::message::SyncPublisher;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};

const ORDER_RESOURCE: &str = "order";
const TABLE_RESOURCE: &str = "dining_table";

/// Result of an order write
///
/// `table` is set when the write also changed the table's status.
#[derive(Debug, Clone)]
pub struct OrderOutcome {
    pub order: Order,
    pub table: Option<DiningTable>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    tables: DiningTableRepository,
    menu: MenuItemRepository,
    locks: Arc<TableLocks>,
    sync: SyncPublisher,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, locks: Arc<TableLocks>, sync: SyncPublisher) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            tables: DiningTableRepository::new(db.clone()),
            menu: MenuItemRepository::new(db),
            locks,
            sync,
        }
    }

    /// Broadcast the order and, when it moved, its table. Caller holds the lock.
    fn publish(&self, action: &str, outcome: &OrderOutcome) {
        self.sync.publish(
            ORDER_RESOURCE,
            action,
            &outcome.order.id_string(),
            Some(&outcome.order),
        );
        if let Some(table) = &outcome.table {
            self.sync
                .publish(TABLE_RESOURCE, "updated", &table.id_string(), Some(table));
        }
    }

    /// Place a new order and occupy its table
    pub async fn place_order(
        &self,
        req: PlaceOrderRequest,
        actor: &CurrentUser,
    ) -> Result<OrderOutcome, OrderError> {
        require(actor, ORDERS_PLACE)?;
        if req.table_number <= 0 {
            return Err(OrderError::Validation(
                crate::utils::AppError::validation("table_number must be positive")
                    .with_detail("field", "table_number"),
            ));
        }
        validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)
            .map_err(OrderError::Validation)?;
        validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN).map_err(OrderError::Validation)?;
        shared::order::money::validate_inputs(&req.items)?;

        // only existing tables get a lock entry
        if self.tables.find_by_number(req.table_number).await?.is_none() {
            return Err(OrderError::TableNotFound(req.table_number));
        }
        let _guard = self.locks.lock(req.table_number).await;

        let mut table = self
            .tables
            .find_by_number(req.table_number)
            .await?
            .ok_or(OrderError::TableNotFound(req.table_number))?;
        if !table.status.accepts_orders() {
            return Err(OrderError::TableUnavailable(req.table_number));
        }

        let menu = self.load_menu(&req.items).await?;
        let items = resolve_items(&req.items, &menu)?;

        let now = now_millis();
        let order = self
            .orders
            .create(new_order(req, items, &actor.id, now))
            .await?;

        let table = if matches!(table.status, TableStatus::Available | TableStatus::Reserved) {
            table.set_status(TableStatus::Occupied, now);
            Some(self.tables.save(table).await?)
        } else {
            None
        };

        tracing::info!(
            order_id = %order.id_string(),
            table_number = order.table_number,
            total = order.total,
            placed_by = %actor.username,
            "Order placed"
        );
        let outcome = OrderOutcome { order, table };
        self.publish("created", &outcome);
        Ok(outcome)
    }

    /// Replace an order's lines while the bill is still open
    pub async fn replace_items(
        &self,
        order_id: &str,
        req: ReplaceItemsRequest,
        actor: &CurrentUser,
    ) -> Result<OrderOutcome, OrderError> {
        require(actor, ORDERS_EDIT)?;
        shared::order::money::validate_inputs(&req.items)?;

        let table_number = self.get(order_id).await?.table_number;
        let _guard = self.locks.lock(table_number).await;
        let mut order = self.get(order_id).await?;

        check_version(&order, req.expected_version)?;
        let menu = self.load_menu(&req.items).await?;
        let items = resolve_items(&req.items, &menu)?;
        apply_items(&mut order, items, now_millis())?;

        let order = self.orders.save(order).await?;
        tracing::info!(
            order_id = %order.id_string(),
            version = order.version,
            total = order.total,
            by = %actor.username,
            "Order items replaced"
        );
        let outcome = OrderOutcome { order, table: None };
        self.publish("updated", &outcome);
        Ok(outcome)
    }

    /// Move an order through its lifecycle
    ///
    /// A terminal order releases its table when it was the table's last
    /// active order.
    pub async fn transition(
        &self,
        order_id: &str,
        req: TransitionRequest,
        actor: &CurrentUser,
    ) -> Result<OrderOutcome, OrderError> {
        require(actor, transition_permission(req.status))?;

        let table_number = self.get(order_id).await?.table_number;
        let _guard = self.locks.lock(table_number).await;
        let mut order = self.get(order_id).await?;

        check_version(&order, req.expected_version)?;
        let from = order.status;
        let now = now_millis();
        apply_transition(&mut order, req.status, &actor.id, req.reason, now)?;
        let order = self.orders.save(order).await?;

        tracing::info!(
            order_id = %order.id_string(),
            from = %from,
            to = %order.status,
            version = order.version,
            by = %actor.username,
            "Order status changed"
        );

        let table = if order.status.is_terminal() {
            self.release_table(order.table_number, now).await?
        } else {
            None
        };
        let outcome = OrderOutcome { order, table };
        self.publish("updated", &outcome);
        Ok(outcome)
    }

    pub async fn get(&self, order_id: &str) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// List orders, newest first
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        match resolve_filter(filter)? {
            Some(query) => Ok(self.orders.find(&query).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Repair table statuses that drifted from their orders
    ///
    /// - occupied without an active order → available
    /// - available / reserved with an active order → occupied
    ///
    /// Returns the corrected tables.
    pub async fn reconcile_tables(&self) -> Result<Vec<DiningTable>, OrderError> {
        let busy: HashSet<i32> = self.orders.active_table_numbers().await?.into_iter().collect();
        let mut fixed = Vec::new();

        for table in self.tables.find_all().await? {
            let has_active = busy.contains(&table.number);
            if table.status == TableStatus::Maintenance && has_active {
                tracing::warn!(
                    table_number = table.number,
                    "Table under maintenance still has active orders"
                );
                continue;
            }
            if drift_target(table.status, has_active).is_none() {
                continue;
            }
            // re-check under the lock, a write may have landed since the scan
            let _guard = self.locks.lock(table.number).await;
            let Some(table) = self.tables.find_by_number(table.number).await? else {
                continue;
            };
            let active = self.orders.count_active_by_table(table.number).await? > 0;
            let Some(target) = drift_target(table.status, active) else {
                continue;
            };

            let from = table.status;
            let mut table = table;
            table.set_status(target, now_millis());
            let table = self.tables.save(table).await?;
            tracing::info!(
                table_number = table.number,
                from = %from,
                to = %target,
                "Table status reconciled"
            );
            self.sync
                .publish(TABLE_RESOURCE, "updated", &table.id_string(), Some(&table));
            fixed.push(table);
        }

        if !fixed.is_empty() {
            tracing::warn!(count = fixed.len(), "Reconciled drifted table statuses");
        }
        Ok(fixed)
    }

    /// Caller holds the table lock
    async fn release_table(
        &self,
        table_number: i32,
        now: i64,
    ) -> Result<Option<DiningTable>, OrderError> {
        if self.orders.count_active_by_table(table_number).await? > 0 {
            return Ok(None);
        }
        let Some(mut table) = self.tables.find_by_number(table_number).await? else {
            tracing::warn!(table_number, "Order closed on a table that no longer exists");
            return Ok(None);
        };
        if table.status != TableStatus::Occupied {
            return Ok(None);
        }

        table.set_status(TableStatus::Available, now);
        let table = self.tables.save(table).await?;
        tracing::info!(table_number, "Table released");
        Ok(Some(table))
    }

    /// Fetch each referenced menu item once
    async fn load_menu(
        &self,
        inputs: &[shared::order::OrderItemInput],
    ) -> Result<HashMap<String, MenuItem>, OrderError> {
        let mut menu = HashMap::new();
        for input in inputs {
            if menu.contains_key(&input.menu_item_id) {
                continue;
            }
            let item = self
                .menu
                .find_by_id(&input.menu_item_id)
                .await
                .map_err(|_| OrderError::MenuItemNotFound(input.menu_item_id.clone()))?
                .ok_or_else(|| OrderError::MenuItemNotFound(input.menu_item_id.clone()))?;
            menu.insert(input.menu_item_id.clone(), item);
        }
        Ok(menu)
    }
}

/// Status a table should drift to given whether it has active orders
fn drift_target(status: TableStatus, active: bool) -> Option<TableStatus> {
    match status {
        TableStatus::Occupied if !active => Some(TableStatus::Available),
        TableStatus::Available | TableStatus::Reserved if active => Some(TableStatus::Occupied),
        _ => None,
    }
}

fn require(actor: &CurrentUser, permission: &'static str) -> Result<(), OrderError> {
    if actor.has_permission(permission) {
        Ok(())
    } else {
        crate::security_log!(
            "WARN",
            "permission_denied",
            user_id = actor.id.clone(),
            username = actor.username.clone(),
            required_permission = permission
        );
        Err(OrderError::PermissionDenied(permission))
    }
}

/// Turn the query-string filter into repository terms
///
/// `None` when the filter cannot match anything.
pub fn resolve_filter(filter: &OrderFilter) -> Result<Option<OrderQuery>, OrderError> {
    let mut statuses = match &filter.status {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<OrderStatus>().map_err(|e| {
                    OrderError::Validation(
                        crate::utils::AppError::validation(e.to_string())
                            .with_detail("field", "status"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    if filter.active_only {
        if statuses.is_empty() {
            statuses = OrderStatus::ALL
                .into_iter()
                .filter(|s| s.is_active())
                .collect();
        } else {
            statuses.retain(|s| s.is_active());
            if statuses.is_empty() {
                return Ok(None);
            }
        }
    }

    let from = filter
        .from
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(OrderError::Validation)?;
    let to = filter
        .to
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(OrderError::Validation)?;
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(OrderError::Validation(crate::utils::AppError::validation(
            "from must not be after to",
        )));
    }

    Ok(Some(OrderQuery {
        statuses,
        table_number: filter.table,
        created_from: from.map(day_start_millis),
        created_to: to.map(day_end_millis),
        limit: filter.limit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_target() {
        use TableStatus::*;
        assert_eq!(drift_target(Occupied, false), Some(Available));
        assert_eq!(drift_target(Available, true), Some(Occupied));
        assert_eq!(drift_target(Reserved, true), Some(Occupied));
        assert_eq!(drift_target(Occupied, true), None);
        assert_eq!(drift_target(Reserved, false), None);
        assert_eq!(drift_target(Maintenance, true), None);
    }

    #[test]
    fn test_resolve_filter_statuses() {
        let q = resolve_filter(&OrderFilter {
            status: Some("pending, ready".into()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();
        assert_eq!(q.statuses, vec![OrderStatus::Pending, OrderStatus::Ready]);

        let err = resolve_filter(&OrderFilter {
            status: Some("eaten".into()),
            ..Default::default()
        });
        assert!(matches!(err, Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_resolve_filter_active_only() {
        let q = resolve_filter(&OrderFilter {
            active_only: true,
            ..Default::default()
        })
        .unwrap()
        .unwrap();
        assert_eq!(q.statuses.len(), 6);
        assert!(q.statuses.iter().all(|s| s.is_active()));

        let q = resolve_filter(&OrderFilter {
            active_only: true,
            status: Some("completed".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(q.is_none());
    }

    #[test]
    fn test_resolve_filter_dates() {
        let q = resolve_filter(&OrderFilter {
            from: Some("2024-05-01".into()),
            to: Some("2024-05-01".into()),
            ..Default::default()
        })
        .unwrap()
        .unwrap();
        let (from, to) = (q.created_from.unwrap(), q.created_to.unwrap());
        assert_eq!(to - from, 86_400_000);

        assert!(resolve_filter(&OrderFilter {
            from: Some("2024-05-02".into()),
            to: Some("2024-05-01".into()),
            ..Default::default()
        })
        .is_err());
    }
}
