use tokio_util::sync::CancellationToken;

/// 应用层上下文（Application Context）
///
/// 承载一次请求范围内的横切信息：
/// - 关联 ID（`correlation_id`）：用于日志串联；
/// - 取消令牌（`cancellation`）：请求被放弃时协作式停止发布/读取。
///
/// ```rust
/// use relay_application::context::AppContext;
///
/// let ctx = AppContext::new().with_correlation_id("cor-123");
/// assert_eq!(ctx.correlation_id.as_deref(), Some("cor-123"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub correlation_id: Option<String>,
    pub cancellation: CancellationToken,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}
