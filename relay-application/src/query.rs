use crate::dto::Dto;

/// 应用层查询（Query）
///
/// 表达只读意图，如按入队时间读取分区日志。
/// - 结果返回 [`Dto`](crate::dto::Dto)；
/// - 与 [`Command`](crate::command::Command) 相对，`Query` 不产生发送等副作用。
pub trait Query: Send + Sync + 'static {
    const NAME: &'static str;

    type Dto: Dto;
}
