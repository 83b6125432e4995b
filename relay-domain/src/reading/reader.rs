//! 分区读取器（PartitionReader）
//!
//! 读取是一个可重启、有限的惰性序列：`plan` 完成校验与分区发现，`records` 每次调用
//! 都基于同一计划产生一条新的记录流，`read_by_time` 将其完整消费为结果列表。
//!
//! 分区严格顺序读取，取消仅在读取每个分区前与拉取每条记录前检查。
//!
//! 负载类型由调用方选择：`records`/`read_by_time` 按 `MessageTemplate` 解码，
//! `records_as`/`read_by_time_as` 可解码为任意 `DeserializeOwned` 类型（如 Event Grid 事件）；
//! 解码失败的记录一律告警并跳过。
//!
use super::{EventRecord, ReadOutcome, ReadPlan, ReadWindow};
use crate::broker::{EventPosition, PartitionedLogClient, RawEventStream, ReadOptions};
use crate::config::ReaderConfig;
use crate::error::{DomainError, DomainResult as Result};
use crate::message::MessageTemplate;
use chrono::{DateTime, Utc};
use futures_core::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt, stream};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct PartitionReader<L> {
    log: Arc<L>,
    config: ReaderConfig,
}

impl<L> PartitionReader<L>
where
    L: PartitionedLogClient + 'static,
{
    pub fn new(log: Arc<L>, config: ReaderConfig) -> Self {
        Self { log, config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// 校验窗口并发现分区
    ///
    /// 起始时间晚于当前时刻时直接拒绝，不发生任何 I/O；
    /// 指定的分区不存在时返回 `InvalidPartition`，附带全部可用分区。
    pub async fn plan(&self, window: &ReadWindow, token: &CancellationToken) -> Result<ReadPlan> {
        let now = Utc::now();
        if window.start_time() > now {
            return Err(DomainError::validation("Start time cannot be in the future"));
        }

        let end_time = window.end_time().unwrap_or(now);
        let max_results = window
            .max_results()
            .unwrap_or(self.config.default_max_results);
        let filter = window.partition_id().map(str::to_string);

        info!(
            start_time = %window.start_time(),
            end_time = %end_time,
            max_results,
            partition_filter = filter.as_deref().unwrap_or("-"),
            "Reading events by enqueue time"
        );

        let discovered = self.log.list_partition_ids(token).await?;
        let partitions = match &filter {
            Some(id) if !discovered.iter().any(|p| p == id) => {
                return Err(DomainError::InvalidPartition {
                    partition_id: id.clone(),
                    available: discovered,
                });
            }
            Some(id) => vec![id.clone()],
            None => {
                info!(partition_count = discovered.len(), "Reading from all partitions");
                discovered
            }
        };

        Ok(ReadPlan {
            start_time: window.start_time(),
            end_time,
            max_results,
            partition_filter: filter,
            partitions,
        })
    }

    /// 基于计划产生一条新的惰性记录流
    pub fn records(
        &self,
        plan: &ReadPlan,
        token: &CancellationToken,
    ) -> BoxStream<'static, Result<EventRecord>> {
        self.records_as::<MessageTemplate>(plan, token)
    }

    /// 同 `records`，负载解码为 `T`
    pub fn records_as<T>(
        &self,
        plan: &ReadPlan,
        token: &CancellationToken,
    ) -> BoxStream<'static, Result<EventRecord<T>>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let cursor = Cursor {
            log: self.log.clone(),
            options: ReadOptions {
                max_wait_time: self.config.max_wait_time,
            },
            early_stop_threshold: self.config.early_stop_threshold,
            token: token.clone(),
            start_time: plan.start_time,
            end_time: plan.end_time,
            max_results: plan.max_results,
            partitions: plan.partitions.clone().into_iter(),
            current: None,
            total: 0,
            done: false,
        };

        stream::unfold(cursor, |mut cursor| async move {
            cursor.next_record::<T>().await.map(|item| (item, cursor))
        })
        .boxed()
    }

    /// 读取窗口内的记录，最多 `max_results` 条
    pub async fn read_by_time(
        &self,
        window: &ReadWindow,
        token: &CancellationToken,
    ) -> Result<ReadOutcome> {
        self.read_by_time_as::<MessageTemplate>(window, token).await
    }

    pub async fn read_by_time_as<T>(
        &self,
        window: &ReadWindow,
        token: &CancellationToken,
    ) -> Result<ReadOutcome<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let plan = self.plan(window, token).await?;
        if plan.partitions.is_empty() {
            warn!("No partitions found in the event log");
            return Ok(ReadOutcome::from_plan(&plan, Vec::new()));
        }

        let records: Vec<EventRecord<T>> = self.records_as(&plan, token).try_collect().await?;
        Ok(ReadOutcome::from_plan(&plan, records))
    }
}

/// 读取状态机的游标：跨分区推进并维护全局计数
struct Cursor<L> {
    log: Arc<L>,
    options: ReadOptions,
    early_stop_threshold: usize,
    token: CancellationToken,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    max_results: usize,
    partitions: std::vec::IntoIter<String>,
    current: Option<PartitionCursor>,
    total: usize,
    done: bool,
}

impl<L> Cursor<L>
where
    L: PartitionedLogClient,
{
    async fn next_record<T: DeserializeOwned>(&mut self) -> Option<Result<EventRecord<T>>> {
        loop {
            if self.done {
                return None;
            }
            if self.total >= self.max_results || self.token.is_cancelled() {
                self.finish();
                return None;
            }

            let Some(partition) = self.current.as_mut() else {
                let Some(partition_id) = self.partitions.next() else {
                    self.finish();
                    return None;
                };
                info!(
                    partition_id = %partition_id,
                    start_time = %self.start_time,
                    remaining = self.max_results - self.total,
                    "Reading events from partition"
                );
                let position = EventPosition::from_enqueued_time(self.start_time);
                let opened = self
                    .log
                    .read_from(&partition_id, position, &self.options, &self.token)
                    .await;
                match opened.map(|events| PartitionCursor::new(partition_id, events)) {
                    Ok(partition) => self.current = Some(partition),
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                }
                continue;
            };

            match partition
                .step(self.end_time, self.early_stop_threshold)
                .await
            {
                Step::Record(record) => {
                    self.total += 1;
                    return Some(Ok(record));
                }
                Step::Skip => {}
                Step::Exhausted => {
                    partition.report();
                    self.current = None;
                }
                Step::Failed(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if self.total == 0 {
            info!("No events found in the specified partition(s) for the given time range");
        } else {
            info!(total = self.total, "Total events read across partition(s)");
        }
    }
}

enum Step<T> {
    Record(EventRecord<T>),
    Skip,
    Exhausted,
    Failed(DomainError),
}

/// 单分区读取状态
struct PartitionCursor {
    partition_id: String,
    events: RawEventStream,
    /// 已检视的候选记录数
    inspected: usize,
    /// 是否见到过非空负载
    found_valid: bool,
    yielded: usize,
}

impl PartitionCursor {
    fn new(partition_id: String, events: RawEventStream) -> Self {
        Self {
            partition_id,
            events,
            inspected: 0,
            found_valid: false,
            yielded: 0,
        }
    }

    /// 检视超过 `early_stop_threshold` 条候选记录仍无非空负载时放弃该分区
    async fn step<T: DeserializeOwned>(
        &mut self,
        end_time: DateTime<Utc>,
        early_stop_threshold: usize,
    ) -> Step<T> {
        if !self.found_valid && self.inspected > early_stop_threshold {
            warn!(
                partition_id = %self.partition_id,
                inspected = self.inspected,
                "No valid events found, stopping read"
            );
            return Step::Exhausted;
        }

        let raw = match self.events.next().await {
            None => return Step::Exhausted,
            Some(Err(err)) => return Step::Failed(err),
            Some(Ok(raw)) => raw,
        };
        self.inspected += 1;

        let Some(body) = raw.body else {
            return Step::Skip;
        };
        self.found_valid = true;

        if raw.enqueued_time > end_time {
            return Step::Exhausted;
        }

        match serde_json::from_slice::<T>(&body) {
            Ok(data) => {
                self.yielded += 1;
                debug!(
                    partition_id = %self.partition_id,
                    sequence_number = raw.sequence_number,
                    "Added message"
                );
                Step::Record(EventRecord {
                    partition_id: self.partition_id.clone(),
                    partition_key: raw.partition_key,
                    sequence_number: raw.sequence_number,
                    enqueued_time: raw.enqueued_time,
                    data,
                })
            }
            Err(err) => {
                warn!(
                    partition_id = %self.partition_id,
                    sequence_number = raw.sequence_number,
                    error = %err,
                    text = %String::from_utf8_lossy(&body),
                    "Could not deserialize message"
                );
                Step::Skip
            }
        }
    }

    fn report(&self) {
        if self.yielded == 0 {
            info!(
                partition_id = %self.partition_id,
                "No valid events found in partition, moving to next partition"
            );
        } else {
            info!(
                partition_id = %self.partition_id,
                count = self.yielded,
                "Found valid events in partition"
            );
        }
    }
}
