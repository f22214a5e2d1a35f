//! 执行管线
//!
//! `Gatekeeper` 把权限判定、公司作用域校验和审计记录串成一条
//! 围绕被守护操作的管线：
//!
//! ```text
//! execute(resolver, policy, params, op)
//!   1. 解析当前主体          缺失 → NotAuthenticated (1001)
//!   2. 权限判定 (any-of)     拒绝 → PermissionDenied (2001)
//!   3. 公司作用域            拒绝 → CompanyScopeDenied (3001)
//!      （声明了才检查）      解析失败 → CompanyScopeUnresolved (3002)
//!   4. 执行操作体
//!   5. 审计入队（策略声明了审计元数据时，每次尝试恰好一条）
//! ```
//!
//! 判定为拒绝时操作体从不执行；审计故障从不改变操作的结果。

use std::future::Future;
use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Principal;

use crate::audit::{AuditOutcome, AuditRecord, AuditService, AuditSink, AuditWorker};
use crate::authz::scope::UNRESOLVED_SCOPE_DENIAL;
use crate::authz::{Decision, Denial, PrincipalResolver, authorize, check_scope, resolve_company_id};
use crate::config::GuardConfig;
use crate::policy::{OperationParams, OperationPolicy};
use crate::security_log;

/// 审计通道句柄（service 丢弃即通道关闭）
struct AuditHandle {
    service: Arc<AuditService>,
    worker: tokio::task::JoinHandle<()>,
}

/// 声明式守护的执行入口
///
/// 一个进程通常只建一个，`Arc` 共享给各业务模块。
pub struct Gatekeeper {
    audit: Option<AuditHandle>,
}

impl std::fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("audit_enabled", &self.audit.is_some())
            .finish()
    }
}

impl Gatekeeper {
    /// 创建守护入口并启动审计 worker
    ///
    /// `config.enable_audit` 为假时不启动 worker，也不构造记录。
    pub fn new(config: GuardConfig, sink: Arc<dyn AuditSink>) -> Self {
        let audit = if config.enable_audit {
            let (service, rx) = AuditService::new(config.audit_buffer_size);
            let worker = tokio::spawn(AuditWorker::new(sink).run(rx));
            Some(AuditHandle { service, worker })
        } else {
            tracing::info!("Audit recording disabled by configuration");
            None
        };

        Self { audit }
    }

    /// 围绕操作体执行完整守护管线
    ///
    /// 返回操作体自己的结果；任何一步拒绝都短路成对应的
    /// [`AppError`]，操作体不执行。
    pub async fn execute<R, F, Fut, T>(
        &self,
        resolver: &R,
        policy: &OperationPolicy,
        params: OperationParams,
        op: F,
    ) -> AppResult<T>
    where
        R: PrincipalResolver + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let principal = resolver.current_principal();

        if let Decision::Deny(denial) = check_attempt(principal.as_ref(), policy, &params) {
            log_denial(principal.as_ref(), &denial);
            self.audit_attempt(
                policy,
                principal.as_ref(),
                &params,
                AuditOutcome::Denied {
                    reason: denial.message.clone(),
                },
            )
            .await;
            return Err(AppError::with_message(denial.code, denial.message));
        }

        let result = op().await;

        let outcome = match &result {
            Ok(_) => AuditOutcome::Success,
            Err(e) => AuditOutcome::Failed {
                error: e.message.clone(),
            },
        };
        self.audit_attempt(policy, principal.as_ref(), &params, outcome)
            .await;

        result
    }

    /// 关闭审计通道并等待 worker 清空积压
    ///
    /// 有序停机时调用。未入队的记录不存在，已入队的全部投递完。
    pub async fn shutdown(self) {
        if let Some(handle) = self.audit {
            drop(handle.service);
            if let Err(e) = handle.worker.await {
                tracing::error!("Audit worker task failed: {:?}", e);
            }
        }
    }

    /// 策略声明了审计元数据时构造并入队一条记录
    async fn audit_attempt(
        &self,
        policy: &OperationPolicy,
        principal: Option<&Principal>,
        params: &OperationParams,
        outcome: AuditOutcome,
    ) {
        let Some(handle) = &self.audit else { return };
        let Some(audit_policy) = &policy.audit else {
            return;
        };

        let record = AuditRecord {
            action: audit_policy.action.clone(),
            entity: audit_policy.entity.clone(),
            actor_id: principal.map(|p| p.id.clone()),
            timestamp: shared::util::now_millis(),
            description: audit_policy.description.clone(),
            parameters: audit_policy.include_parameters.then(|| params.to_value()),
            outcome,
        };

        handle.service.record(record).await;
    }
}

/// 纯判定：权限 + 公司作用域，返回第一个拒绝
fn check_attempt(
    principal: Option<&Principal>,
    policy: &OperationPolicy,
    params: &OperationParams,
) -> Decision {
    if let Decision::Deny(denial) = authorize(principal, &policy.required_permissions) {
        // 配置的拒绝文案只覆盖权限拒绝，不覆盖未认证
        let denial = if denial.code == ErrorCode::PermissionDenied {
            override_message(denial, policy.denial_message.as_deref())
        } else {
            denial
        };
        return Decision::Deny(denial);
    }

    let Some(scope_policy) = &policy.company_context else {
        return Decision::Allow;
    };
    let Some(principal) = principal else {
        return Decision::deny(
            ErrorCode::NotAuthenticated,
            ErrorCode::NotAuthenticated.message(),
        );
    };

    match resolve_company_id(scope_policy.parameter_binding.as_deref(), params) {
        Some(target) => match check_scope(principal, target) {
            Decision::Allow => Decision::Allow,
            Decision::Deny(denial) => Decision::Deny(override_message(
                denial,
                scope_policy.denial_message.as_deref(),
            )),
        },
        // 目标公司解析不出来就拒绝，绝不放行
        None => Decision::Deny(override_message(
            Denial::new(ErrorCode::CompanyScopeUnresolved, UNRESOLVED_SCOPE_DENIAL),
            scope_policy.denial_message.as_deref(),
        )),
    }
}

fn override_message(denial: Denial, message: Option<&str>) -> Denial {
    match message {
        Some(message) => Denial::new(denial.code, message),
        None => denial,
    }
}

/// 拒绝写入安全日志（target = "security"）
fn log_denial(principal: Option<&Principal>, denial: &Denial) {
    let event = match denial.code {
        ErrorCode::NotAuthenticated => "auth_missing",
        ErrorCode::CompanyScopeDenied => "company_scope_denied",
        ErrorCode::CompanyScopeUnresolved => "company_scope_unresolved",
        _ => "permission_denied",
    };

    security_log!(
        "WARN",
        event,
        code = denial.code.code() as u64,
        actor = principal.map(|p| p.id.clone()).unwrap_or_else(|| "-".into()),
        role = principal
            .map(|p| p.role.as_str().to_string())
            .unwrap_or_else(|| "-".into()),
        reason = denial.message.clone()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::registry::{MANAGE_COMPANY, MANAGE_INVENTORY, MANAGE_ORDERS};
    use crate::policy::CompanyScopePolicy;
    use serde_json::json;
    use shared::models::Role;

    fn policy_requiring(perm: &str) -> OperationPolicy {
        OperationPolicy::new().require(perm)
    }

    #[test]
    fn test_check_passes_permission_and_scope() {
        let p = Principal::new("emp-1", Role::Mesero, 5);
        let policy = policy_requiring(MANAGE_ORDERS)
            .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"));
        let params = OperationParams::new().with("company_id", json!(5));

        assert!(check_attempt(Some(&p), &policy, &params).is_allow());
    }

    #[test]
    fn test_check_permission_gate_fires_before_scope() {
        // Params point at another company, but the permission gate decides first
        let p = Principal::new("emp-1", Role::Mesero, 5);
        let policy = policy_requiring(MANAGE_INVENTORY)
            .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"));
        let params = OperationParams::new().with("company_id", json!(9));

        match check_attempt(Some(&p), &policy, &params) {
            Decision::Deny(d) => assert_eq!(d.code, ErrorCode::PermissionDenied),
            Decision::Allow => panic!("mesero must not manage inventory"),
        }
    }

    #[test]
    fn test_check_applies_configured_denial_message() {
        let p = Principal::new("emp-1", Role::Cocinero, 5);
        let policy = policy_requiring(MANAGE_ORDERS).with_denial_message("Solo cajeros");

        match check_attempt(Some(&p), &policy, &OperationParams::new()) {
            Decision::Deny(d) => {
                assert_eq!(d.code, ErrorCode::PermissionDenied);
                assert_eq!(d.message, "Solo cajeros");
            }
            Decision::Allow => panic!("cocinero must not manage orders"),
        }
    }

    #[test]
    fn test_check_unauthenticated_keeps_standard_message() {
        let policy = policy_requiring(MANAGE_ORDERS).with_denial_message("Solo cajeros");

        match check_attempt(None, &policy, &OperationParams::new()) {
            Decision::Deny(d) => {
                assert_eq!(d.code, ErrorCode::NotAuthenticated);
                assert_ne!(d.message, "Solo cajeros");
            }
            Decision::Allow => panic!("absent principal must be denied"),
        }
    }

    #[test]
    fn test_check_unresolved_scope_fails_closed() {
        let p = Principal::new("emp-1", Role::Admin, 5);
        let policy = OperationPolicy::new()
            .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"));

        match check_attempt(Some(&p), &policy, &OperationParams::new()) {
            Decision::Deny(d) => assert_eq!(d.code, ErrorCode::CompanyScopeUnresolved),
            Decision::Allow => panic!("unresolved target must be denied"),
        }
    }

    #[test]
    fn test_check_scope_denial_message_override() {
        let p = Principal::new("emp-1", Role::Admin, 5);
        let policy = OperationPolicy::new().with_company_scope(
            CompanyScopePolicy::new()
                .bound_to("company_id")
                .with_denial_message("Empresa ajena"),
        );
        let params = OperationParams::new().with("company_id", json!(9));

        match check_attempt(Some(&p), &policy, &params) {
            Decision::Deny(d) => {
                assert_eq!(d.code, ErrorCode::CompanyScopeDenied);
                assert_eq!(d.message, "Empresa ajena");
            }
            Decision::Allow => panic!("cross-company access must be denied"),
        }
    }

    #[test]
    fn test_check_super_admin_crosses_companies() {
        let p = Principal::new("root", Role::SuperAdmin, 1);
        let policy = policy_requiring(MANAGE_COMPANY)
            .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"));
        let params = OperationParams::new().with("company_id", json!(9));

        assert!(check_attempt(Some(&p), &policy, &params).is_allow());
    }
}
