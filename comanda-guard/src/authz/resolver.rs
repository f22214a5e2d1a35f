//! 当前主体解析
//!
//! 主体由调用方显式传入，而不是从线程局部或全局状态里捞。
//! 任何能给出 `Option<Principal>` 的东西都可以充当解析器。

use shared::models::Principal;

/// 向执行管线提供当前主体
///
/// 返回 `None` 表示当前调用未认证，管线会据此拒绝。
pub trait PrincipalResolver {
    fn current_principal(&self) -> Option<Principal>;
}

/// 已认证调用：直接拿主体本身当解析器
impl PrincipalResolver for Principal {
    fn current_principal(&self) -> Option<Principal> {
        Some(self.clone())
    }
}

/// 认证可选的调用方（例如认证中间件的输出）
impl PrincipalResolver for Option<Principal> {
    fn current_principal(&self) -> Option<Principal> {
        self.clone()
    }
}

impl<R: PrincipalResolver + ?Sized> PrincipalResolver for &R {
    fn current_principal(&self) -> Option<Principal> {
        (**self).current_principal()
    }
}
