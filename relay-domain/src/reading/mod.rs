//! 按时间窗口读取分区日志（reading）
//!
//! 给定起始时间、可选结束时间与结果上限，依分区枚举顺序逐个分区读取：
//! - 校验 → 发现分区 → 逐分区读取 → 完成；
//! - 单分区在超出结束时间、达到剩余预算或触发提前终止时结束；
//! - 全局结果达到上限后不再推进到后续分区；
//! - 单条记录反序列化失败仅告警并跳过。
//!
mod reader;
mod record;
mod window;

pub use reader::PartitionReader;
pub use record::EventRecord;
pub use window::{ReadOutcome, ReadPlan, ReadStatus, ReadWindow};
