use super::MessageTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 发布事件的类型
pub const MESSAGE_SENT_EVENT_TYPE: &str = "MessageSent";
/// 事件数据版本
pub const EVENT_DATA_VERSION: &str = "1.0";
/// 事件元数据版本（Event Grid schema）
pub const EVENT_METADATA_VERSION: &str = "1";
/// 追加到事件主题末尾的优先级属性键
pub const PRIORITY_PROPERTY: &str = "priority";

/// Event Grid 事件（经分区日志转存后读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridMessage {
    pub id: String,
    /// 如 `messages/MessagePublished/3/high`
    pub subject: String,
    pub data: EventGridData,
    pub event_type: String,
    #[serde(default)]
    pub data_version: String,
    #[serde(default)]
    pub metadata_version: String,
    pub event_time: DateTime<Utc>,
    /// 由 Event Grid 投递时填充，发布侧为空
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridData {
    pub message: MessageTemplate,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub message_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl EventGridMessage {
    /// 第 `index`（从 0 开始）条消息对应的 `MessageSent` 事件
    ///
    /// 主题为 `{topic}/MessagePublished/{index + 1}`，携带优先级时再追加 `/{priority}`。
    pub fn message_sent(
        id: String,
        topic: &str,
        index: usize,
        message: MessageTemplate,
        group_id: Option<&str>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        let priority = properties
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(PRIORITY_PROPERTY))
            .map(|(_, value)| value.clone())
            .unwrap_or_default();

        let mut subject = format!("{topic}/MessagePublished/{}", index + 1);
        if !priority.is_empty() {
            subject.push('/');
            subject.push_str(&priority);
        }

        Self {
            id,
            subject,
            data: EventGridData {
                message,
                group_id: group_id.unwrap_or_default().to_string(),
                priority,
                message_type: MESSAGE_SENT_EVENT_TYPE.to_string(),
                properties,
            },
            event_type: MESSAGE_SENT_EVENT_TYPE.to_string(),
            data_version: EVENT_DATA_VERSION.to_string(),
            metadata_version: EVENT_METADATA_VERSION.to_string(),
            event_time: Utc::now(),
            topic: String::new(),
        }
    }
}
