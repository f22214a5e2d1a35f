//! 审计拦截
//!
//! # 架构
//!
//! ```text
//! Gatekeeper::execute()
//!   └─ AuditRecord 构造 → AuditService::record() → mpsc → AuditWorker → AuditSink
//! ```
//!
//! 操作声明了审计元数据时，每次尝试（放行、拒绝、执行失败）
//! 恰好产生一条记录；未声明则一条也没有。投递失败记日志后
//! 吞掉，绝不改变被守护操作的结果。

pub mod service;
pub mod sink;
pub mod types;
pub mod worker;

pub use service::AuditService;
pub use sink::{AuditSink, AuditSinkError, MemoryAuditSink, TracingAuditSink};
pub use types::{AuditOutcome, AuditRecord};
pub use worker::AuditWorker;
