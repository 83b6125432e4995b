use serde::{Deserialize, Serialize};

/// 消息模板（线上字段名与外部 JSON 保持一致）
///
/// 拒绝未知字段，其他形态的负载（如 Event Grid 事件）不会被误读为模板。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplate {
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// 投递延迟（秒）
    #[serde(rename = "delaySec", default)]
    pub delay_seconds: u32,
}

impl MessageTemplate {
    /// 派生第 `index`（从 0 开始）条消息的模板：正文追加 `(Message i of n)` 序号
    pub fn numbered(&self, index: usize, count: usize) -> MessageTemplate {
        let content = self.content.as_deref().unwrap_or_default();
        MessageTemplate {
            recipient: self.recipient.clone(),
            subject: self.subject.clone(),
            content: Some(format!("{content} (Message {} of {count})", index + 1)),
            delay_seconds: self.delay_seconds,
        }
    }
}
