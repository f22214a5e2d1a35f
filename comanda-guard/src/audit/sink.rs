//! 审计投递端
//!
//! 记录最终去向由外部协作方决定：tracing 事件、上报服务、
//! 数据库等等。核心只依赖 `AuditSink` 这一个接口。

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::types::AuditRecord;

/// 审计投递错误
///
/// 投递失败不致命：worker 记日志后继续，绝不影响被守护操作。
#[derive(Debug, thiserror::Error)]
pub enum AuditSinkError {
    /// 投递端自身失败（网络、存储等）
    #[error("audit delivery failed: {0}")]
    Delivery(String),
    /// 记录无法序列化
    #[error("audit record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 审计记录投递端
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// 投递端名称（用于失败日志）
    fn name(&self) -> &'static str;

    /// 投递一条记录
    async fn deliver(&self, record: &AuditRecord) -> Result<(), AuditSinkError>;
}

/// 把审计记录写成 `tracing` 结构化事件（target = "audit"）
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    fn name(&self) -> &'static str {
        "tracing"
    }

    async fn deliver(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        let payload = serde_json::to_string(record)?;
        tracing::info!(
            target: "audit",
            action = %record.action,
            entity = %record.entity,
            actor = record.actor_id.as_deref().unwrap_or("-"),
            outcome = record.outcome.label(),
            payload = %payload,
            "audit record"
        );
        Ok(())
    }
}

/// 内存投递端（测试与嵌入场景）
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收到的全部记录（拷贝）
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn deliver(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}
