//! Menu and categories
//!
//! - [`catalog`] - pure rules: category nesting, item field checks, public menu grouping
//! - [`service`] - [`MenuService`], CRUD over the repositories

pub mod catalog;
pub mod service;

pub use catalog::MenuSection;
pub use service::{CategoryChange, MenuService};
