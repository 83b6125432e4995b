use chrono::{DateTime, Utc};
use relay_domain::message::MessageTemplate;
use relay_domain::publishing::PublishOutcome;
use relay_domain::reading::{EventRecord, ReadOutcome};
use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，字段名与外部 JSON 约定一致；
/// - 与领域模型解耦，避免将内部状态（如分区游标）暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

/// 批量发布结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub requested: usize,
    pub sent: usize,
    pub batches: usize,
    pub timed_out: bool,
}

impl Dto for PublishResponse {}

impl From<PublishOutcome> for PublishResponse {
    fn from(outcome: PublishOutcome) -> Self {
        Self {
            requested: outcome.requested,
            sent: outcome.sent,
            batches: outcome.batches,
            timed_out: outcome.timed_out,
        }
    }
}

/// 无匹配记录时返回的说明对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyReadResponse<T = MessageTemplate> {
    pub message: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub partition_id: Option<String>,
    pub messages: Vec<EventRecord<T>>,
}

/// 按时间读取的结果：记录列表，或为空时的说明对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadMessagesResponse<T = MessageTemplate> {
    Messages(Vec<EventRecord<T>>),
    Empty(EmptyReadResponse<T>),
}

impl<T> Dto for ReadMessagesResponse<T> where T: Serialize + Send + Sync + 'static {}

impl<T> From<ReadOutcome<T>> for ReadMessagesResponse<T> {
    fn from(outcome: ReadOutcome<T>) -> Self {
        match outcome.message() {
            None => ReadMessagesResponse::Messages(outcome.records),
            Some(message) => ReadMessagesResponse::Empty(EmptyReadResponse {
                message,
                start_time: outcome.start_time,
                end_time: outcome.end_time,
                partition_id: outcome.partition_filter,
                messages: Vec::new(),
            }),
        }
    }
}

impl<T> ReadMessagesResponse<T> {
    pub fn records(&self) -> &[EventRecord<T>] {
        match self {
            ReadMessagesResponse::Messages(records) => records,
            ReadMessagesResponse::Empty(_) => &[],
        }
    }
}
