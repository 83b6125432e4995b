//! 内存版协作者（InMemoryBroker / InMemoryEventLog）
//!
//! 满足 `BrokerClient` 与 `PartitionedLogClient` 协议的轻量实现：
//! - `InMemoryBroker`：按条数/字节数限制批次容量，记录每次发送的批次，可模拟发送延迟与失败；
//! - `InMemoryEventLog`：按插入顺序保存分区与记录，统计枚举/读取/拉取次数，便于断言。
//!
//! 典型用途：测试环境、示例与本地开发。
//!
use super::{
    BatchOptions, BrokerClient, EventPosition, MessageBatch, PartitionedLogClient, RawEvent,
    RawEventStream, ReadOptions,
};
use crate::error::{DomainError, DomainResult as Result};
use crate::message::OutboundMessage;
use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 批次容量限制；两项均可不设
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_messages: Option<usize>,
    pub max_bytes: Option<usize>,
}

impl BatchLimits {
    pub fn messages(max_messages: usize) -> Self {
        Self {
            max_messages: Some(max_messages),
            max_bytes: None,
        }
    }

    pub fn bytes(max_bytes: usize) -> Self {
        Self {
            max_messages: None,
            max_bytes: Some(max_bytes),
        }
    }
}

/// 内存批次
#[derive(Debug)]
pub struct InMemoryBatch {
    limits: BatchLimits,
    options: BatchOptions,
    messages: Vec<OutboundMessage>,
    bytes: usize,
}

impl InMemoryBatch {
    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }
}

impl MessageBatch for InMemoryBatch {
    fn try_add(&mut self, message: &OutboundMessage) -> bool {
        if let Some(max) = self.limits.max_messages {
            if self.messages.len() + 1 > max {
                return false;
            }
        }
        let size = message.size_hint();
        if let Some(max) = self.limits.max_bytes {
            if self.bytes + size > max {
                return false;
            }
        }
        self.bytes += size;
        self.messages.push(message.clone());
        true
    }

    fn len(&self) -> usize {
        self.messages.len()
    }
}

/// 内存消息中间件
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    limits: BatchLimits,
    send_latency: Option<Duration>,
    fail_sends: Arc<Mutex<Option<String>>>,
    sent: Arc<Mutex<Vec<InMemoryBatch>>>,
}

impl InMemoryBroker {
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// 每次发送前等待指定时长（用于模拟网络耗时）
    pub fn with_send_latency(mut self, latency: Duration) -> Self {
        self.send_latency = Some(latency);
        self
    }

    /// 之后的发送均以传输错误失败
    pub fn fail_sends_with(&self, reason: impl Into<String>) {
        *lock(&self.fail_sends) = Some(reason.into());
    }

    /// 每次发送的批次大小（按发送顺序）
    pub fn batch_sizes(&self) -> Vec<usize> {
        lock(&self.sent).iter().map(|b| b.len()).collect()
    }

    /// 已发送的全部消息（按发送顺序展开）
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        lock(&self.sent)
            .iter()
            .flat_map(|b| b.messages.iter().cloned())
            .collect()
    }

    /// 每次发送所用的批次选项
    pub fn sent_options(&self) -> Vec<BatchOptions> {
        lock(&self.sent).iter().map(|b| b.options.clone()).collect()
    }
}

#[async_trait]
impl BrokerClient for InMemoryBroker {
    type Batch = InMemoryBatch;

    async fn create_batch(&self, options: &BatchOptions) -> Result<InMemoryBatch> {
        Ok(InMemoryBatch {
            limits: self.limits,
            options: options.clone(),
            messages: Vec::new(),
            bytes: 0,
        })
    }

    async fn send(&self, batch: InMemoryBatch, _token: &CancellationToken) -> Result<()> {
        if let Some(latency) = self.send_latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(reason) = lock(&self.fail_sends).clone() {
            return Err(DomainError::transport(reason));
        }
        lock(&self.sent).push(batch);
        Ok(())
    }
}

/// 内存分区日志
#[derive(Clone, Default)]
pub struct InMemoryEventLog {
    partitions: Arc<Mutex<Vec<(String, Vec<RawEvent>)>>>,
    list_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
    pulled: Arc<AtomicUsize>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加分区（若已存在则追加记录），分区枚举顺序即首次出现顺序
    pub fn with_partition(self, partition_id: impl Into<String>, events: Vec<RawEvent>) -> Self {
        self.append(partition_id, events);
        self
    }

    pub fn append(&self, partition_id: impl Into<String>, events: Vec<RawEvent>) {
        let partition_id = partition_id.into();
        let mut partitions = lock(&self.partitions);
        match partitions.iter_mut().find(|(id, _)| *id == partition_id) {
            Some((_, existing)) => existing.extend(events),
            None => partitions.push((partition_id, events)),
        }
    }

    /// `list_partition_ids` 调用次数
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// `read_from` 调用次数
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::Relaxed)
    }

    /// 所有分区流累计被拉取的记录数
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PartitionedLogClient for InMemoryEventLog {
    async fn list_partition_ids(&self, _token: &CancellationToken) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(lock(&self.partitions)
            .iter()
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn read_from(
        &self,
        partition_id: &str,
        position: EventPosition,
        _options: &ReadOptions,
        _token: &CancellationToken,
    ) -> Result<RawEventStream> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        let events: Vec<RawEvent> = lock(&self.partitions)
            .iter()
            .find(|(id, _)| id == partition_id)
            .map(|(_, events)| {
                events
                    .iter()
                    .filter(|e| e.enqueued_time >= position.enqueued_time())
                    .cloned()
                    .collect()
            })
            .ok_or_else(|| DomainError::transport(format!("unknown partition: {partition_id}")))?;

        let pulled = self.pulled.clone();
        let stream = stream::iter(events).map(move |e| {
            pulled.fetch_add(1, Ordering::Relaxed);
            Ok(e)
        });
        Ok(Box::pin(stream))
    }
}
