//! 权限判定
//!
//! 纯函数，无副作用：相同输入永远得到相同判定，可安全并发调用。

use shared::error::ErrorCode;
use shared::models::{Principal, Role};

use super::{Decision, registry};

/// 判定主体能否执行需要 `required` 权限的操作
///
/// # 规则
///
/// 1. 主体缺失 → Deny（未认证），与权限集合无关
/// 2. `required` 为空 → Allow（仅要求已认证）
/// 3. 否则持有任一所需权限即 Allow（any-of 语义）
pub fn authorize(principal: Option<&Principal>, required: &[String]) -> Decision {
    let Some(principal) = principal else {
        return Decision::deny(
            ErrorCode::NotAuthenticated,
            ErrorCode::NotAuthenticated.message(),
        );
    };

    if required.is_empty() {
        return Decision::Allow;
    }

    if required
        .iter()
        .any(|p| registry::has_permission(principal.role, p))
    {
        Decision::Allow
    } else {
        Decision::deny(
            ErrorCode::PermissionDenied,
            ErrorCode::PermissionDenied.message(),
        )
    }
}

/// 角色白名单判定
pub fn is_role(principal: &Principal, allowed: &[Role]) -> bool {
    allowed.contains(&principal.role)
}

/// 是否超级管理员
pub fn is_super_admin(principal: &Principal) -> bool {
    is_role(principal, &[Role::SuperAdmin])
}

/// 是否管理员（SUPER_ADMIN 或 ADMIN）
pub fn is_admin(principal: &Principal) -> bool {
    is_role(principal, &[Role::SuperAdmin, Role::Admin])
}
