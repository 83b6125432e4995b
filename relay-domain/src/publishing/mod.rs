//! 批量发布（publishing）
//!
//! 将一个消息模板展开为 N 条出站消息，按传输层容量累积成批次并逐批发送：
//! - 当前批次装不下时先发送并重开批次，再将同一条消息重试加入新批次；
//! - 空的新批次仍装不下则视为超大消息，立即终止；
//! - 整体截止时间到期时提前结束并返回已发送条数，不视为错误。
//!
mod deadline;
mod publisher;

pub use deadline::Deadline;
pub use publisher::{BatchPublisher, PublishOutcome};
