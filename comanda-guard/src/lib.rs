//! Comanda Guard - 餐厅管理后端的授权与审计核心
//!
//! # 架构概述
//!
//! 本 crate 提供声明式策略与围绕操作的执行管线：
//!
//! - **角色权限表** (`authz::registry`): 六个固定角色到权限的静态映射
//! - **权限判定** (`authz::evaluator`): any-of 语义的纯函数判定
//! - **公司作用域** (`authz::scope`): 多租户隔离，SUPER_ADMIN 全局放行
//! - **策略元数据** (`policy`): 挂在操作上的权限/作用域/审计声明
//! - **审计拦截** (`audit`): mpsc 通道 + 后台 worker + 可插拔 sink
//! - **执行管线** (`pipeline`): `Gatekeeper` 把以上各层串起来
//!
//! # 模块结构
//!
//! ```text
//! comanda-guard/src/
//! ├── authz/         # 权限表、判定、公司作用域、主体解析
//! ├── policy.rs      # 操作策略元数据
//! ├── audit/         # 审计记录、入队服务、worker、sink
//! ├── config.rs      # 环境变量配置
//! └── pipeline.rs    # Gatekeeper 执行管线
//! ```

pub mod audit;
pub mod authz;
pub mod config;
pub mod pipeline;
pub mod policy;

// Re-export 公共类型
pub use audit::{
    AuditOutcome, AuditRecord, AuditService, AuditSink, AuditSinkError, AuditWorker,
    MemoryAuditSink, TracingAuditSink,
};
pub use authz::{
    Decision, Denial, PrincipalResolver, authorize, check_scope, is_admin, is_role,
    is_super_admin,
};
pub use config::GuardConfig;
pub use pipeline::Gatekeeper;
pub use policy::{AuditPolicy, CompanyScopePolicy, OperationParams, OperationPolicy};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCode};
pub use shared::models::{CompanyId, Principal, Role};

// Security logging macro - 支持 tracing 字段
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
