//! Pure order mutations
//!
//! Everything here works on in-memory documents; the service wraps these
//! in table locks and persistence.

use std::collections::HashMap;

use shared::order::money::{self, validate_price};
use shared::order::{OrderItem, OrderItemInput, OrderStatus, PlaceOrderRequest, StatusChange};

use super::OrderError;
use crate::db::models::{MenuItem, Order};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Build stored line items from client input
///
/// Name and price are snapshotted from `menu`, keyed by "menu_item:xxx".
pub fn resolve_items(
    inputs: &[OrderItemInput],
    menu: &HashMap<String, MenuItem>,
) -> Result<Vec<OrderItem>, OrderError> {
    money::validate_inputs(inputs)?;

    inputs
        .iter()
        .map(|input| {
            validate_optional_text(&input.note, "note", MAX_NOTE_LEN)
                .map_err(OrderError::Validation)?;

            let menu_item = menu
                .get(&input.menu_item_id)
                .ok_or_else(|| OrderError::MenuItemNotFound(input.menu_item_id.clone()))?;
            if !menu_item.is_visible {
                return Err(OrderError::MenuItemUnavailable(input.menu_item_id.clone()));
            }
            validate_price(menu_item.price)?;

            let menu_item_id = match menu_item.id_string() {
                id if id.is_empty() => input.menu_item_id.clone(),
                id => id,
            };
            Ok(OrderItem {
                menu_item_id,
                name: menu_item.name.clone(),
                price: menu_item.price,
                quantity: input.quantity,
                note: input
                    .note
                    .as_ref()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
            })
        })
        .collect()
}

/// A fresh `pending` order at version 1
pub fn new_order(req: PlaceOrderRequest, items: Vec<OrderItem>, actor: &str, now: i64) -> Order {
    let total = money::compute_total(&items);
    Order {
        id: None,
        table_number: req.table_number,
        customer_name: req.customer_name.trim().to_string(),
        items,
        total,
        status: OrderStatus::Pending,
        notes: req.notes.filter(|n| !n.trim().is_empty()),
        placed_by: actor.to_string(),
        confirmed_by: None,
        billed_by: None,
        completed_by: None,
        cancelled_by: None,
        cancel_reason: None,
        history: vec![StatusChange {
            from: None,
            to: OrderStatus::Pending,
            by: actor.to_string(),
            at: now,
        }],
        version: 1,
        created_at: now,
        updated_at: now,
        closed_at: None,
    }
}

/// Optimistic concurrency check; `None` skips it
pub fn check_version(order: &Order, expected: Option<u64>) -> Result<(), OrderError> {
    match expected {
        Some(expected) if expected != order.version => Err(OrderError::VersionConflict {
            expected,
            actual: order.version,
        }),
        _ => Ok(()),
    }
}

/// Replace all lines and recompute the total
pub fn apply_items(order: &mut Order, items: Vec<OrderItem>, now: i64) -> Result<(), OrderError> {
    if !order.status.accepts_item_changes() {
        return Err(match order.status {
            s if s.is_terminal() => {
                OrderError::Transition(shared::order::TransitionError::Terminal(s))
            }
            s => OrderError::ItemsLocked(s),
        });
    }
    order.total = money::compute_total(&items);
    order.items = items;
    order.version += 1;
    order.updated_at = now;
    Ok(())
}

/// Move the order to `target`, recording who did it
pub fn apply_transition(
    order: &mut Order,
    target: OrderStatus,
    actor: &str,
    reason: Option<String>,
    now: i64,
) -> Result<(), OrderError> {
    order.status.check_transition(target)?;

    match target {
        OrderStatus::Confirmed => order.confirmed_by = Some(actor.to_string()),
        OrderStatus::Billed => order.billed_by = Some(actor.to_string()),
        OrderStatus::Completed => order.completed_by = Some(actor.to_string()),
        OrderStatus::Cancelled => {
            let reason = reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .ok_or(OrderError::ReasonRequired)?;
            validate_optional_text(&Some(reason.clone()), "reason", MAX_NOTE_LEN)
                .map_err(OrderError::Validation)?;
            order.cancelled_by = Some(actor.to_string());
            order.cancel_reason = Some(reason);
        }
        _ => {}
    }

    order.history.push(StatusChange {
        from: Some(order.status),
        to: target,
        by: actor.to_string(),
        at: now,
    });
    order.status = target;
    order.version += 1;
    order.updated_at = now;
    if target.is_terminal() {
        order.closed_at = Some(now);
    }
    Ok(())
}
