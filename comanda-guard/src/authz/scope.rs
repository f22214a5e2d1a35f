//! 公司作用域校验
//!
//! 多租户隔离的最后防线：除 SUPER_ADMIN 外，任何主体只能操作
//! 自己公司的数据。无法解析目标公司时拒绝（fail-closed）。

use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{CompanyId, Principal, Role};

use super::Decision;
use crate::policy::OperationParams;

/// 跨公司访问的默认拒绝文案
pub const DEFAULT_SCOPE_DENIAL: &str = "No access to this company's data";

/// 目标公司无法解析时的拒绝文案
pub const UNRESOLVED_SCOPE_DENIAL: &str = "Target company could not be resolved for this operation";

/// 判定主体能否触达 `target` 公司的数据
///
/// SUPER_ADMIN 全局放行；其余角色要求与主体归属公司严格相等。
pub fn check_scope(principal: &Principal, target: CompanyId) -> Decision {
    if principal.role == Role::SuperAdmin {
        return Decision::Allow;
    }

    if principal.company_id == target {
        Decision::Allow
    } else {
        Decision::deny(ErrorCode::CompanyScopeDenied, DEFAULT_SCOPE_DENIAL)
    }
}

/// 从操作参数中解析目标公司
///
/// 有显式绑定时只看该参数。没有绑定时先找名为 `company_id` 的参数，
/// 找不到再扫描对象参数里的 `company_id` 字段，仅当候选值唯一时采纳。
/// 返回 `None` 表示解析失败，调用方必须拒绝。
pub fn resolve_company_id(binding: Option<&str>, params: &OperationParams) -> Option<CompanyId> {
    if let Some(name) = binding {
        return params.get(name).and_then(company_id_of);
    }

    if let Some(id) = params.get("company_id").and_then(company_id_of) {
        return Some(id);
    }

    let mut candidates: Vec<CompanyId> = params
        .iter()
        .filter_map(|(_, value)| match value {
            Value::Object(_) => company_id_of(value),
            _ => None,
        })
        .collect();
    candidates.dedup();

    match candidates.split_first() {
        Some((first, rest)) if rest.iter().all(|c| c == first) => Some(*first),
        _ => None,
    }
}

/// 单个参数值 → 公司 ID
///
/// 接受整数、数字字符串，或带 `company_id` 字段的对象（递归一层层取）。
fn company_id_of(value: &Value) -> Option<CompanyId> {
    match value {
        Value::Number(n) => n.as_i64().map(CompanyId),
        Value::String(s) => s.parse::<i64>().ok().map(CompanyId),
        Value::Object(map) => map.get("company_id").and_then(company_id_of),
        _ => None,
    }
}
