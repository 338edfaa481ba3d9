//! Money calculation using rust_decimal
//!
//! Prices are stored as `f64` but every sum goes through `Decimal` and is
//! rounded to 2 decimal places (half-up, away from zero).

use rust_decimal::prelude::*;
use thiserror::Error;

use super::types::{OrderItem, OrderItemInput};

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Allowed quantity per line item
pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 999;
/// Maximum number of lines on a single order
pub const MAX_ITEMS_PER_ORDER: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    #[error("order must contain at least one item")]
    Empty,
    #[error("order has too many lines ({0}, max {MAX_ITEMS_PER_ORDER})")]
    TooManyItems(usize),
    #[error("quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {0}")]
    Quantity(i32),
    #[error("price must be a finite number between 0 and {MAX_PRICE}, got {0}")]
    Price(f64),
}

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

pub fn validate_price(price: f64) -> Result<(), MoneyError> {
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        return Err(MoneyError::Price(price));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), MoneyError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(MoneyError::Quantity(quantity));
    }
    Ok(())
}

/// Validate submitted lines before menu lookup
pub fn validate_inputs(items: &[OrderItemInput]) -> Result<(), MoneyError> {
    if items.is_empty() {
        return Err(MoneyError::Empty);
    }
    if items.len() > MAX_ITEMS_PER_ORDER {
        return Err(MoneyError::TooManyItems(items.len()));
    }
    items.iter().try_for_each(|i| validate_quantity(i.quantity))
}

/// price × quantity as a precise decimal
pub fn line_total(item: &OrderItem) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Order total, rounded to cents
pub fn compute_total(items: &[OrderItem]) -> f64 {
    to_f64(items.iter().map(line_total).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            menu_item_id: "menu_item:x".into(),
            name: "x".into(),
            price,
            quantity,
            note: None,
        }
    }

    fn input(quantity: i32) -> OrderItemInput {
        OrderItemInput {
            menu_item_id: "menu_item:x".into(),
            quantity,
            note: None,
        }
    }

    #[test]
    fn test_compute_total_avoids_float_drift() {
        // 0.1 + 0.2 in plain f64 is 0.30000000000000004
        let items = vec![item(0.1, 1), item(0.2, 1)];
        assert_eq!(compute_total(&items), 0.3);
    }

    #[test]
    fn test_compute_total_many_small_items() {
        let items: Vec<_> = (0..100).map(|_| item(0.01, 3)).collect();
        assert_eq!(compute_total(&items), 3.0);
    }

    #[test]
    fn test_compute_total_multiplies_quantity() {
        let items = vec![item(12.5, 2), item(3.99, 3)];
        assert_eq!(compute_total(&items), 36.97);
        assert_eq!(compute_total(&[]), 0.0);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(to_f64(Decimal::new(5, 3)), 0.01);
        assert_eq!(to_f64(Decimal::new(4, 3)), 0.0);
        assert_eq!(to_f64(Decimal::new(-5, 3)), -0.01);
    }

    #[test]
    fn test_validate_inputs() {
        assert_eq!(validate_inputs(&[]), Err(MoneyError::Empty));
        assert_eq!(validate_inputs(&[input(0)]), Err(MoneyError::Quantity(0)));
        assert_eq!(
            validate_inputs(&[input(1), input(1000)]),
            Err(MoneyError::Quantity(1000))
        );
        assert!(validate_inputs(&[input(1), input(999)]).is_ok());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(MAX_PRICE).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }
}
