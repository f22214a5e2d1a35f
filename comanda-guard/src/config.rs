/// 守护层配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | AUDIT_BUFFER_SIZE | 256 | 审计通道容量 |
/// | ENABLE_AUDIT_LOG | true | 是否产生审计记录 |
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// 审计 mpsc 通道容量
    pub audit_buffer_size: usize,
    /// 是否启用审计记录（关闭后连记录都不构造）
    pub enable_audit: bool,
}

impl GuardConfig {
    /// 从环境变量加载配置
    ///
    /// 环境变量未设置或无法解析时使用默认值
    pub fn from_env() -> Self {
        Self {
            audit_buffer_size: std::env::var("AUDIT_BUFFER_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            enable_audit: std::env::var("ENABLE_AUDIT_LOG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 使用自定义值构造（测试场景）
    pub fn with_overrides(audit_buffer_size: usize, enable_audit: bool) -> Self {
        Self {
            audit_buffer_size,
            enable_audit,
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
