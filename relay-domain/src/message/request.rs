use super::{MessageTemplate, OutboundMessage};
use crate::config::PayloadFormat;
use crate::error::{DomainError, DomainResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 覆盖默认截止时长的属性键（值为整数秒）
pub const TIMEOUT_PROPERTY: &str = "Timeout";

/// 消息属性（有序键值对，作为出站消息的应用属性）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageProperty {
    pub key: String,
    pub value: String,
}

impl MessageProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 批量发布请求
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct PublishRequest {
    /// 需要派生并发送的消息条数
    #[serde(rename = "messageCount", default = "default_count")]
    #[builder(default = 1)]
    count: usize,
    /// 分组键（分区/会话亲和）
    #[serde(rename = "messageGroup", default)]
    group_key: Option<String>,
    #[serde(default)]
    #[builder(default)]
    properties: Vec<MessageProperty>,
    body: Option<MessageTemplate>,
}

fn default_count() -> usize {
    1
}

impl PublishRequest {
    pub fn count(&self) -> usize {
        self.count
    }

    /// 非空分组键
    pub fn group_key(&self) -> Option<&str> {
        self.group_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn properties(&self) -> &[MessageProperty] {
        &self.properties
    }

    pub fn body(&self) -> Option<&MessageTemplate> {
        self.body.as_ref()
    }

    /// 发送前校验：模板必须存在，条数至少为 1
    pub fn validate(&self) -> DomainResult<&MessageTemplate> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| DomainError::validation("invalid message format: missing body"))?;
        if self.count < 1 {
            return Err(DomainError::validation("messageCount must be at least 1"));
        }
        Ok(body)
    }

    /// `Timeout` 属性给出的截止时长；未携带时返回 `None`
    pub fn timeout_override(&self) -> DomainResult<Option<Duration>> {
        let Some(prop) = self
            .properties
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(TIMEOUT_PROPERTY))
        else {
            return Ok(None);
        };

        let secs: u64 = prop.value.trim().parse().map_err(|_| {
            DomainError::validation(format!(
                "{TIMEOUT_PROPERTY} property must be a non-negative integer (seconds), got '{}'",
                prop.value
            ))
        })?;
        Ok(Some(Duration::from_secs(secs)))
    }

    /// 派生第 `index` 条出站消息
    pub fn outbound(&self, template: &MessageTemplate, index: usize) -> DomainResult<OutboundMessage> {
        OutboundMessage::new(
            template.numbered(index, self.count),
            label_for(template, index, self.count),
            self.properties.clone(),
            self.group_key().map(str::to_string),
        )
    }

    /// 按负载形态派生第 `index` 条出站消息；`topic` 仅用于 Event Grid 事件主题
    pub fn outbound_as(
        &self,
        format: PayloadFormat,
        topic: &str,
        template: &MessageTemplate,
        index: usize,
    ) -> DomainResult<OutboundMessage> {
        match format {
            PayloadFormat::Template => self.outbound(template, index),
            PayloadFormat::EventGrid => OutboundMessage::event_grid(
                template.numbered(index, self.count),
                label_for(template, index, self.count),
                self.properties.clone(),
                self.group_key().map(str::to_string),
                topic,
                index,
            ),
        }
    }
}

fn label_for(template: &MessageTemplate, index: usize, count: usize) -> String {
    let subject = template.subject.as_deref().unwrap_or("Message");
    format!("{subject} {} of {count}", index + 1)
}
