//! Permission Definitions
//!
//! Role based permissions. A role's permissions are written into the JWT at
//! login; route layers and the order service check them by name.
//!
//! | Permission       | admin | waiter | chef | cashier |
//! |------------------|:-----:|:------:|:----:|:-------:|
//! | orders:place     |   ✓   |   ✓    |      |    ✓    |
//! | orders:edit      |   ✓   |   ✓    |      |    ✓    |
//! | orders:confirm   |   ✓   |   ✓    |      |         |
//! | orders:kitchen   |   ✓   |        |  ✓   |         |
//! | orders:serve     |   ✓   |   ✓    |      |         |
//! | orders:settle    |   ✓   |        |      |    ✓    |
//! | orders:cancel    |   ✓   |   ✓    |      |    ✓    |
//! | tables:status    |   ✓   |   ✓    |      |    ✓    |
//! | tables:manage    |   ✓   |        |      |         |
//! | menu:manage      |   ✓   |        |      |         |
//! | reports:view     |   ✓   |        |      |    ✓    |
//! | staff:manage     |   ✓   |        |      |         |

use shared::models::StaffRole;
use shared::order::OrderStatus;

pub const ORDERS_PLACE: &str = "orders:place";
pub const ORDERS_EDIT: &str = "orders:edit";
pub const ORDERS_CONFIRM: &str = "orders:confirm";
pub const ORDERS_KITCHEN: &str = "orders:kitchen";
pub const ORDERS_SERVE: &str = "orders:serve";
pub const ORDERS_SETTLE: &str = "orders:settle";
pub const ORDERS_CANCEL: &str = "orders:cancel";
pub const TABLES_STATUS: &str = "tables:status";
pub const TABLES_MANAGE: &str = "tables:manage";
pub const MENU_MANAGE: &str = "menu:manage";
pub const REPORTS_VIEW: &str = "reports:view";
pub const STAFF_MANAGE: &str = "staff:manage";

/// Every assignable permission
pub const ALL_PERMISSIONS: &[&str] = &[
    ORDERS_PLACE,
    ORDERS_EDIT,
    ORDERS_CONFIRM,
    ORDERS_KITCHEN,
    ORDERS_SERVE,
    ORDERS_SETTLE,
    ORDERS_CANCEL,
    TABLES_STATUS,
    TABLES_MANAGE,
    MENU_MANAGE,
    REPORTS_VIEW,
    STAFF_MANAGE,
];

pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

pub const DEFAULT_WAITER_PERMISSIONS: &[&str] = &[
    ORDERS_PLACE,
    ORDERS_EDIT,
    ORDERS_CONFIRM,
    ORDERS_SERVE,
    ORDERS_CANCEL,
    TABLES_STATUS,
];

pub const DEFAULT_CHEF_PERMISSIONS: &[&str] = &[ORDERS_KITCHEN];

pub const DEFAULT_CASHIER_PERMISSIONS: &[&str] = &[
    ORDERS_PLACE,
    ORDERS_EDIT,
    ORDERS_SETTLE,
    ORDERS_CANCEL,
    TABLES_STATUS,
    REPORTS_VIEW,
];

/// Get permissions for a role
pub fn get_default_permissions(role: StaffRole) -> Vec<String> {
    let perms = match role {
        StaffRole::Admin => DEFAULT_ADMIN_PERMISSIONS,
        StaffRole::Waiter => DEFAULT_WAITER_PERMISSIONS,
        StaffRole::Chef => DEFAULT_CHEF_PERMISSIONS,
        StaffRole::Cashier => DEFAULT_CASHIER_PERMISSIONS,
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Permission required to move an order into `target`
pub const fn transition_permission(target: OrderStatus) -> &'static str {
    match target {
        // placement is not a transition, but keep the match total
        OrderStatus::Pending => ORDERS_PLACE,
        OrderStatus::Confirmed => ORDERS_CONFIRM,
        OrderStatus::Preparing | OrderStatus::Ready => ORDERS_KITCHEN,
        OrderStatus::Served => ORDERS_SERVE,
        OrderStatus::Billed | OrderStatus::Completed => ORDERS_SETTLE,
        OrderStatus::Cancelled => ORDERS_CANCEL,
    }
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    permission == "all" || ALL_PERMISSIONS.contains(&permission) || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;

    fn user_with_role(role: StaffRole) -> CurrentUser {
        CurrentUser {
            id: "staff:t".into(),
            username: "t".into(),
            display_name: "T".into(),
            role,
            permissions: get_default_permissions(role),
        }
    }

    #[test]
    fn test_transition_matrix() {
        use OrderStatus::*;
        let cases = [
            (Confirmed, [true, true, false, false]),
            (Preparing, [true, false, true, false]),
            (Ready, [true, false, true, false]),
            (Served, [true, true, false, false]),
            (Billed, [true, false, false, true]),
            (Completed, [true, false, false, true]),
            (Cancelled, [true, true, false, true]),
        ];
        let roles = [
            StaffRole::Admin,
            StaffRole::Waiter,
            StaffRole::Chef,
            StaffRole::Cashier,
        ];

        for (target, expected) in cases {
            for (role, allowed) in roles.iter().zip(expected) {
                let user = user_with_role(*role);
                assert_eq!(
                    user.has_permission(transition_permission(target)),
                    allowed,
                    "{role} -> {target}"
                );
            }
        }
    }

    #[test]
    fn test_default_permissions_are_valid() {
        for role in [StaffRole::Waiter, StaffRole::Chef, StaffRole::Cashier] {
            for p in get_default_permissions(role) {
                assert!(is_valid_permission(&p), "{p}");
            }
        }
        assert_eq!(get_default_permissions(StaffRole::Admin), vec!["all"]);
        assert!(!is_valid_permission("orders:fly"));
    }

    #[test]
    fn test_only_admin_manages_staff_and_menu() {
        for role in [StaffRole::Waiter, StaffRole::Chef, StaffRole::Cashier] {
            let user = user_with_role(role);
            assert!(!user.has_permission(STAFF_MANAGE));
            assert!(!user.has_permission(MENU_MANAGE));
            assert!(!user.has_permission(TABLES_MANAGE));
        }
    }
}
