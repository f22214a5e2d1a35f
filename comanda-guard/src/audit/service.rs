//! 审计服务（入队前端）
//!
//! 守护管线只跟 `AuditService` 打交道：构造好记录后入队，
//! 投递由后台 worker 完成。

use std::sync::Arc;

use tokio::sync::mpsc;

use super::types::AuditRecord;

/// 审计记录入队前端
///
/// 记录经有界 mpsc 通道送往后台 worker。通道满时等待空位，
/// 不丢记录；通道关闭说明 worker 已停，只能记错误日志。
pub struct AuditService {
    tx: mpsc::Sender<AuditRecord>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建服务，返回交给 worker 的接收端
    pub fn new(buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<AuditRecord>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Arc::new(Self { tx }), rx)
    }

    /// 入队一条审计记录
    ///
    /// 阻塞发送，审计记录不允许丢失。
    pub async fn record(&self, record: AuditRecord) {
        if self.tx.send(record).await.is_err() {
            tracing::error!("Audit channel closed, audit record lost!");
        }
    }
}
