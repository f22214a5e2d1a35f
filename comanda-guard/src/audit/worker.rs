//! 审计后台 worker
//!
//! 从 mpsc 通道消费审计记录并交给 sink 投递。
//! 发送端全部关闭后先清空积压再退出，已入队的记录不丢。

use std::sync::Arc;

use tokio::sync::mpsc;

use super::sink::AuditSink;
use super::types::AuditRecord;

/// 审计记录后台消费者
pub struct AuditWorker {
    sink: Arc<dyn AuditSink>,
}

impl AuditWorker {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// 运行 worker（阻塞直到通道关闭且积压清空）
    pub async fn run(self, mut rx: mpsc::Receiver<AuditRecord>) {
        tracing::info!("📋 Audit worker started (sink: {})", self.sink.name());

        while let Some(record) = rx.recv().await {
            match self.sink.deliver(&record).await {
                Ok(()) => {
                    tracing::debug!(
                        action = %record.action,
                        entity = %record.entity,
                        outcome = record.outcome.label(),
                        "Audit record delivered"
                    );
                }
                Err(e) => {
                    // 投递失败只记日志，绝不反馈给被守护的操作
                    tracing::error!(
                        sink = self.sink.name(),
                        error = %e,
                        "Failed to deliver audit record"
                    );
                }
            }
        }

        tracing::info!("Audit channel closed, worker stopping");
    }
}
