//! 消息中继应用层（relay-application）
//!
//! 在领域核心之上提供薄薄的一层编排：
//! - 命令 `PublishMessages` 与查询 `ReadMessagesByTime`/`ReadEventGridMessagesByTime` 及其处理器；
//! - 与外部 JSON/查询参数字段名一致的 DTO；
//! - 应用错误及其客户端/服务端分类；
//! - 基于环境变量的配置加载与日志初始化。
//!
pub mod command;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod publish_messages;
pub mod query;
pub mod query_handler;
pub mod read_messages;
pub mod telemetry;

pub use publish_messages::{PublishMessages, PublishMessagesHandler};
pub use read_messages::{
    ReadEventGridMessagesByTime, ReadMessagesByTime, ReadMessagesByTimeHandler, ReadQueryParams,
};
