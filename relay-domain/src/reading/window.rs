use super::EventRecord;
use crate::message::MessageTemplate;
use bon::Builder;
use chrono::{DateTime, Utc};

/// 读取窗口
#[derive(Debug, Clone, Builder)]
pub struct ReadWindow {
    /// 起始时间（不得晚于调用时刻）
    start_time: DateTime<Utc>,
    /// 结束时间，缺省为调用时刻
    end_time: Option<DateTime<Utc>>,
    /// 结果上限，缺省取 `ReaderConfig::default_max_results`
    max_results: Option<usize>,
    /// 仅读取指定分区
    partition_id: Option<String>,
}

impl ReadWindow {
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// 非空的分区过滤条件
    pub fn partition_id(&self) -> Option<&str> {
        self.partition_id.as_deref().filter(|p| !p.is_empty())
    }
}

/// 校验与分区发现完成后的读取计划；可多次据此重新读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPlan {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_results: usize,
    pub partition_filter: Option<String>,
    /// 按发现顺序排列的分区，不做重排
    pub partitions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    Found,
    NoEventsInRange,
    NoPartitions,
}

/// 一次读取的完整结果
#[derive(Debug, Clone)]
pub struct ReadOutcome<T = MessageTemplate> {
    pub records: Vec<EventRecord<T>>,
    pub status: ReadStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub partition_filter: Option<String>,
}

impl<T> ReadOutcome<T> {
    pub(crate) fn from_plan(plan: &ReadPlan, records: Vec<EventRecord<T>>) -> Self {
        let status = if plan.partitions.is_empty() {
            ReadStatus::NoPartitions
        } else if records.is_empty() {
            ReadStatus::NoEventsInRange
        } else {
            ReadStatus::Found
        };
        Self {
            records,
            status,
            start_time: plan.start_time,
            end_time: plan.end_time,
            partition_filter: plan.partition_filter.clone(),
        }
    }

    /// 结果为空时的说明文字
    pub fn message(&self) -> Option<String> {
        match self.status {
            ReadStatus::Found => None,
            ReadStatus::NoPartitions => Some("No partitions found in the event log".to_string()),
            ReadStatus::NoEventsInRange => Some(match &self.partition_filter {
                Some(id) => format!(
                    "No messages found in the specified partition {id} for the given time range"
                ),
                None => {
                    "No messages found in the specified partitions for the given time range"
                        .to_string()
                }
            }),
        }
    }
}
