//! 消息中继领域层（relay-domain）
//!
//! 面向托管消息中间件（主题/队列总线、分区事件日志）的核心算法与协议：
//! - 消息模型（`message`）：消息模板、发布请求与派生的出站消息；
//! - 协作者协议（`broker`）：`BrokerClient`/`MessageBatch` 与 `PartitionedLogClient`；
//! - 批量发布（`publishing`）：按容量分批、溢出时刷新并重试、整体截止时间；
//! - 按时间窗口读取（`reading`）：跨分区顺序读取、提前终止与全局结果上限；
//! - 配置（`config`）与统一错误（`error`）。
//!
//! 本 crate 不绑定具体厂商 SDK，真实传输由上层以协作者实现注入；
//! `inmemory` 特性提供内存版实现，便于测试与本地运行。
//!
pub mod broker;
pub mod config;
pub mod error;
pub mod message;
pub mod publishing;
pub mod reading;
