//! Permission Definitions
//!
//! 固定角色 → 权限映射表。
//!
//! ## 设计原则
//! - 角色集合封闭：六个固定角色，不支持运行时自定义
//! - 权限为不透明 token，只做成员判断，核心不解释其含义
//! - SUPER_ADMIN 持有通配符 `*`，匹配任何权限
//! - 整张表为进程级静态数据，无锁共享

use shared::models::Role;

/// 通配符权限（仅 SUPER_ADMIN 持有）
pub const WILDCARD: &str = "*";

// === 模块化权限 (8) ===
/// 订单管理（下单/改单/结账）
pub const MANAGE_ORDERS: &str = "MANAGE_ORDERS";
/// 预订管理
pub const MANAGE_RESERVATIONS: &str = "MANAGE_RESERVATIONS";
/// 发票管理
pub const MANAGE_INVOICES: &str = "MANAGE_INVOICES";
/// 库存管理
pub const MANAGE_INVENTORY: &str = "MANAGE_INVENTORY";
/// 员工管理
pub const MANAGE_EMPLOYEES: &str = "MANAGE_EMPLOYEES";
/// 公司信息管理
pub const MANAGE_COMPANY: &str = "MANAGE_COMPANY";
/// 后厨管理
pub const MANAGE_KITCHEN: &str = "MANAGE_KITCHEN";
/// 报表查看
pub const VIEW_REPORTS: &str = "VIEW_REPORTS";

/// 可授予权限列表（不含通配符）
pub const ALL_PERMISSIONS: &[&str] = &[
    MANAGE_ORDERS,
    MANAGE_RESERVATIONS,
    MANAGE_INVOICES,
    MANAGE_INVENTORY,
    MANAGE_EMPLOYEES,
    MANAGE_COMPANY,
    MANAGE_KITCHEN,
    VIEW_REPORTS,
];

/// SUPER_ADMIN 权限（通配符，匹配一切）
pub const SUPER_ADMIN_PERMISSIONS: &[&str] = &[WILDCARD];

/// ADMIN 权限（全部具体权限，无通配符）
pub const ADMIN_PERMISSIONS: &[&str] = ALL_PERMISSIONS;

/// GERENTE 默认权限（门店运营，不含员工/公司管理）
pub const GERENTE_PERMISSIONS: &[&str] = &[
    MANAGE_ORDERS,
    MANAGE_RESERVATIONS,
    MANAGE_INVOICES,
    MANAGE_INVENTORY,
    MANAGE_KITCHEN,
    VIEW_REPORTS,
];

/// CAJERO 默认权限（收银台）
pub const CAJERO_PERMISSIONS: &[&str] = &[MANAGE_ORDERS, MANAGE_INVOICES, VIEW_REPORTS];

/// MESERO 默认权限（点单与预订）
pub const MESERO_PERMISSIONS: &[&str] = &[MANAGE_ORDERS, MANAGE_RESERVATIONS];

/// COCINERO 默认权限（仅后厨）
pub const COCINERO_PERMISSIONS: &[&str] = &[MANAGE_KITCHEN];

/// Get the fixed permission set for a role
pub const fn permissions_of(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Gerente => GERENTE_PERMISSIONS,
        Role::Cajero => CAJERO_PERMISSIONS,
        Role::Mesero => MESERO_PERMISSIONS,
        Role::Cocinero => COCINERO_PERMISSIONS,
    }
}

/// 检查角色是否持有指定权限
///
/// 持有通配符或精确包含该 token 即为持有。
pub fn has_permission(role: Role, permission: &str) -> bool {
    permissions_of(role)
        .iter()
        .any(|p| *p == WILDCARD || *p == permission)
}

/// Validate if a permission string is grantable
pub fn is_known_permission(permission: &str) -> bool {
    permission == WILDCARD || ALL_PERMISSIONS.contains(&permission)
}
