//! Table service

use std::sync::Arc;

use shared::ErrorCode;
use shared::models::{
    DiningTableCreate, DiningTableUpdate, TableRuleError, TableStatus,
};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::DiningTable;
use crate::db::models::dining_table::DEFAULT_CAPACITY;
use crate::db::repository::{DiningTableRepository, OrderRepository, RepoError};
use crate::message::SyncPublisher;
use crate::orders::TableLocks;
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "dining_table";

/// Table writes run and publish under the table's lock
#[derive(Clone)]
pub struct TableService {
    tables: DiningTableRepository,
    orders: OrderRepository,
    locks: Arc<TableLocks>,
    sync: SyncPublisher,
}

impl TableService {
    pub fn new(db: Surreal<Db>, locks: Arc<TableLocks>, sync: SyncPublisher) -> Self {
        Self {
            tables: DiningTableRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            locks,
            sync,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<DiningTable>> {
        Ok(self.tables.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<DiningTable> {
        self.tables
            .find_by_id(id)
            .await?
            .ok_or_else(|| table_not_found(id))
    }

    pub async fn create(&self, payload: DiningTableCreate) -> AppResult<DiningTable> {
        validate_number(payload.number)?;
        let capacity = payload.capacity.unwrap_or(DEFAULT_CAPACITY);
        validate_capacity(capacity)?;

        let _guard = self.locks.lock(payload.number).await;
        let now = now_millis();
        let table = DiningTable {
            id: None,
            number: payload.number,
            capacity,
            status: TableStatus::Available,
            occupied_since: None,
            created_at: now,
            updated_at: now,
        };
        let table = self.tables.create(table).await.map_err(number_exists)?;
        self.sync
            .publish(RESOURCE, "created", &table.id_string(), Some(&table));
        Ok(table)
    }

    /// Change number and/or capacity
    ///
    /// The number is the orders' reference, so it is frozen while the table
    /// has active orders.
    pub async fn update(&self, id: &str, payload: DiningTableUpdate) -> AppResult<DiningTable> {
        let current = self.get(id).await?;
        let _guard = self.locks.lock(current.number).await;
        let mut table = self.get(id).await?;

        if let Some(number) = payload.number
            && number != table.number
        {
            validate_number(number)?;
            if self.orders.count_active_by_table(table.number).await? > 0 {
                return Err(AppError::with_message(
                    ErrorCode::TableHasOrders,
                    format!("Table {} has active orders", table.number),
                ));
            }
            table.number = number;
        }
        if let Some(capacity) = payload.capacity {
            validate_capacity(capacity)?;
            table.capacity = capacity;
        }
        table.updated_at = now_millis();

        let table = self.tables.save(table).await.map_err(number_exists)?;
        self.sync
            .publish(RESOURCE, "updated", &table.id_string(), Some(&table));
        Ok(table)
    }

    /// Manual status change (seat guests, reserve, maintenance, clear)
    pub async fn set_status(
        &self,
        id: &str,
        status: TableStatus,
        actor: &CurrentUser,
    ) -> AppResult<DiningTable> {
        let current = self.get(id).await?;
        let _guard = self.locks.lock(current.number).await;
        let mut table = self.get(id).await?;

        let active = self.orders.count_active_by_table(table.number).await?;
        TableStatus::check_change(table.status, status, active > 0).map_err(|e| {
            let code = match e {
                TableRuleError::HasActiveOrders(_) => ErrorCode::TableHasOrders,
                TableRuleError::NotAllowed { .. } => ErrorCode::InvalidTableStatusChange,
            };
            AppError::with_message(code, e.to_string())
                .with_detail("from", table.status.as_str())
                .with_detail("to", status.as_str())
        })?;

        if table.status == status {
            return Ok(table);
        }

        let from = table.status;
        table.set_status(status, now_millis());
        let table = self.tables.save(table).await?;
        tracing::info!(
            table_number = table.number,
            from = %from,
            to = %status,
            by = %actor.username,
            "Table status changed"
        );
        self.sync
            .publish(RESOURCE, "updated", &table.id_string(), Some(&table));
        Ok(table)
    }

    /// Delete a table without active orders
    pub async fn delete(&self, id: &str) -> AppResult<DiningTable> {
        let current = self.get(id).await?;
        let _guard = self.locks.lock(current.number).await;

        if self.orders.count_active_by_table(current.number).await? > 0 {
            return Err(AppError::with_message(
                ErrorCode::TableHasOrders,
                format!("Table {} has active orders", current.number),
            ));
        }
        self.tables.delete(id).await?;
        tracing::info!(table_number = current.number, "Table deleted");
        self.sync
            .publish::<()>(RESOURCE, "deleted", &current.id_string(), None);
        Ok(current)
    }
}

fn table_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
}

fn number_exists(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TableNumberExists, msg),
        other => other.into(),
    }
}

fn validate_number(number: i32) -> AppResult<()> {
    if number <= 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Table number must be positive",
        )
        .with_detail("field", "number"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if !(1..=100).contains(&capacity) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Capacity must be between 1 and 100",
        )
        .with_detail("field", "capacity"));
    }
    Ok(())
}
