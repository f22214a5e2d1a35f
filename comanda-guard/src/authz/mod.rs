//! 授权核心
//!
//! - `registry`: 固定角色 → 权限表
//! - `evaluator`: 权限判定（any-of 语义）
//! - `scope`: 公司租户隔离
//! - `resolver`: 当前主体解析接口

pub mod evaluator;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use evaluator::{authorize, is_admin, is_role, is_super_admin};
pub use resolver::PrincipalResolver;
pub use scope::{check_scope, resolve_company_id};

use shared::error::{AppError, AppResult, ErrorCode};

/// 授权判定结果
///
/// 纯数据：Allow，或携带拒绝原因的 Deny。
/// 传输层如何渲染（HTTP 状态码等）由 `shared::error` 的映射决定。
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

/// 拒绝原因：错误码 + 呈现给调用方的消息
///
/// 消息是对外文案；角色/权限内部细节只进 security 日志，不进消息。
#[derive(Debug, Clone, PartialEq)]
pub struct Denial {
    pub code: ErrorCode,
    pub message: String,
}

impl Denial {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Decision {
    /// 构造 Deny
    pub fn deny(code: ErrorCode, message: impl Into<String>) -> Self {
        Decision::Deny(Denial::new(code, message))
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// 转换为 Result：Allow → Ok(()), Deny → Err(AppError)
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(AppError::with_message(denial.code, denial.message)),
        }
    }
}
