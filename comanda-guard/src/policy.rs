//! 操作策略元数据
//!
//! 权限要求、公司作用域、审计描述都是挂在操作上的普通数据，
//! 不含任何判定逻辑。判定在 `authz`，记录在 `audit`。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单个受保护操作的声明式策略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationPolicy {
    /// 所需权限（any-of）；为空表示仅要求已认证
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_permissions: Vec<String>,
    /// 覆盖默认的权限拒绝文案
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial_message: Option<String>,
    /// 声明后启用公司作用域校验
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_context: Option<CompanyScopePolicy>,
    /// 声明后每次尝试（放行或拒绝）都产生一条审计记录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<AuditPolicy>,
}

impl OperationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个所需权限
    pub fn require(mut self, permission: impl Into<String>) -> Self {
        self.required_permissions.push(permission.into());
        self
    }

    pub fn with_denial_message(mut self, message: impl Into<String>) -> Self {
        self.denial_message = Some(message.into());
        self
    }

    pub fn with_company_scope(mut self, scope: CompanyScopePolicy) -> Self {
        self.company_context = Some(scope);
        self
    }

    pub fn with_audit(mut self, audit: AuditPolicy) -> Self {
        self.audit = Some(audit);
        self
    }
}

/// 公司作用域声明
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyScopePolicy {
    /// 携带目标公司 ID 的参数名；缺省时由管线做尽力解析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_binding: Option<String>,
    /// 覆盖默认的跨公司拒绝文案
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial_message: Option<String>,
}

impl CompanyScopePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound_to(mut self, parameter: impl Into<String>) -> Self {
        self.parameter_binding = Some(parameter.into());
        self
    }

    pub fn with_denial_message(mut self, message: impl Into<String>) -> Self {
        self.denial_message = Some(message.into());
        self
    }
}

/// 审计声明：`action`/`entity` 标识操作，`description` 进入记录正文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPolicy {
    pub action: String,
    pub entity: String,
    #[serde(default)]
    pub description: String,
    /// 为真时把操作参数快照写入审计记录
    #[serde(default)]
    pub include_parameters: bool,
}

impl AuditPolicy {
    pub fn new(action: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            entity: entity.into(),
            description: String::new(),
            include_parameters: false,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameters(mut self) -> Self {
        self.include_parameters = true;
        self
    }
}

/// 命名操作参数
///
/// 同时是公司作用域的解析来源和审计参数快照的内容。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationParams(Map<String, Value>);

impl OperationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// 参数快照（审计用）
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}
