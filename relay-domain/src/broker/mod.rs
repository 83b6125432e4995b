//! 中间件协作者协议（broker）
//!
//! 以窄接口替代厂商 SDK 的可变客户端对象，核心算法仅依赖这些协议：
//! - `BrokerClient` / `MessageBatch`：创建容量受限的批次、尝试加入消息、发送批次；
//! - `PartitionedLogClient`：枚举分区 ID、从时间派生的位点开始惰性读取分区。
//!
//! 客户端实例可跨并发调用复用，其同步由实现方负责；本模块不额外加锁。
//!
mod client;
#[cfg(feature = "inmemory")]
mod inmemory;
mod partitioned_log;

pub use client::{BatchOptions, BrokerClient, MessageBatch};
#[cfg(feature = "inmemory")]
pub use inmemory::{BatchLimits, InMemoryBatch, InMemoryBroker, InMemoryEventLog};
pub use partitioned_log::{EventPosition, PartitionedLogClient, RawEvent, RawEventStream, ReadOptions};
