use crate::message::MessageTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 读取结果中的单条记录（附带分区键、序号与入队时间）
///
/// `data` 为解码后的负载，缺省为 `MessageTemplate`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord<T = MessageTemplate> {
    /// 记录所在分区（不参与序列化）
    #[serde(skip)]
    pub partition_id: String,
    pub partition_key: Option<String>,
    pub sequence_number: i64,
    pub enqueued_time: DateTime<Utc>,
    pub data: T,
}
