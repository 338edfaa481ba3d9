//! Database Models
//!
//! Stored documents. Request payloads and status enums live in `shared`.

pub mod serde_helpers;

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod staff;

pub use category::Category;
pub use dining_table::DiningTable;
pub use menu_item::MenuItem;
pub use order::{Order, OrderFilter};
pub use staff::Staff;

/// `id_string()` for documents whose `id` is `Option<RecordId>`
macro_rules! impl_id_string {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// "table:key", empty before the record is stored
                pub fn id_string(&self) -> String {
                    self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
                }
            }
        )+
    };
}

impl_id_string!(Category, DiningTable, MenuItem, Order, Staff);
