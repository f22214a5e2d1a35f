//! 审计记录类型定义
//!
//! 记录是不可变的值对象：核心只负责构造和投递，从不读回。

use serde::{Deserialize, Serialize};

/// 一次受保护尝试的结局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// 检查通过且业务执行成功
    Success,
    /// 在权限或公司作用域检查处被拒绝
    Denied { reason: String },
    /// 检查通过但业务执行返回错误
    Failed { error: String },
}

impl AuditOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Denied { .. } => "denied",
            AuditOutcome::Failed { .. } => "failed",
        }
    }
}

/// 审计记录（不可变）
///
/// 操作声明了审计元数据时，每次尝试恰好产生一条，
/// 不论放行、拒绝还是执行失败。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// 操作类型（如 "CREATE"、"VOID"）
    pub action: String,
    /// 目标实体（如 "Order"、"Reservation"）
    pub entity: String,
    /// 操作人 ID（未认证的尝试为 None）
    pub actor_id: Option<String>,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 策略声明的操作描述
    pub description: String,
    /// 参数快照（策略要求时才有）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
    /// 尝试的结局
    pub outcome: AuditOutcome,
}
