use crate::error::DomainResult as Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_core::stream::BoxStream;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 分区读取位点：由入队时间派生，具体解析交由日志客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPosition {
    enqueued_time: DateTime<Utc>,
}

impl EventPosition {
    pub fn from_enqueued_time(enqueued_time: DateTime<Utc>) -> Self {
        Self { enqueued_time }
    }

    pub fn enqueued_time(&self) -> DateTime<Utc> {
        self.enqueued_time
    }
}

/// 读取选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// 等待下一条记录的最长时间
    pub max_wait_time: Duration,
}

/// 日志中的原始记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// 负载；为空表示无效候选
    pub body: Option<Vec<u8>>,
    pub enqueued_time: DateTime<Utc>,
    pub sequence_number: i64,
    pub partition_key: Option<String>,
}

/// 单个分区的惰性、有限记录流
pub type RawEventStream = BoxStream<'static, Result<RawEvent>>;

/// 分区日志客户端
#[async_trait]
pub trait PartitionedLogClient: Send + Sync {
    /// 枚举分区 ID（顺序由底层决定，不具业务含义）
    async fn list_partition_ids(&self, token: &CancellationToken) -> Result<Vec<String>>;

    /// 从给定位点开始读取分区
    async fn read_from(
        &self,
        partition_id: &str,
        position: EventPosition,
        options: &ReadOptions,
        token: &CancellationToken,
    ) -> Result<RawEventStream>;
}
