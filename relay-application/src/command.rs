use crate::dto::Dto;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，如向中间件批量发布消息。
/// - `NAME`：命令的稳定名称，用于日志与追踪；
/// - `Output`：执行结果摘要（如已发送条数），序列化友好。
pub trait Command: Send + Sync + 'static {
    const NAME: &'static str;

    type Output: Dto;
}
