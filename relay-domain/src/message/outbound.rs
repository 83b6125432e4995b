use super::{EventGridMessage, MessageProperty, MessageTemplate};
use crate::error::DomainResult;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// 出站消息：由模板按序号派生，放入批次发送后即丢弃
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// 中间件侧的消息标识（每次派生都不同）
    message_id: Uuid,
    /// 消息标签，如 `Subject 2 of 5`
    label: String,
    body: MessageTemplate,
    /// 应用属性
    properties: Vec<MessageProperty>,
    /// 分区/会话亲和键
    group_key: Option<String>,
    /// 序列化后的线上负载（JSON）
    payload: Vec<u8>,
}

impl OutboundMessage {
    pub fn new(
        body: MessageTemplate,
        label: String,
        properties: Vec<MessageProperty>,
        group_key: Option<String>,
    ) -> DomainResult<Self> {
        let payload = serde_json::to_vec(&body)?;
        Ok(Self {
            message_id: Uuid::new_v4(),
            label,
            body,
            properties,
            group_key,
            payload,
        })
    }

    /// 以 Event Grid `MessageSent` 事件作为负载；事件 id 即消息标识
    pub fn event_grid(
        body: MessageTemplate,
        label: String,
        properties: Vec<MessageProperty>,
        group_key: Option<String>,
        topic: &str,
        index: usize,
    ) -> DomainResult<Self> {
        let message_id = Uuid::new_v4();
        let event_properties: BTreeMap<String, String> = properties
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect();
        let event = EventGridMessage::message_sent(
            message_id.to_string(),
            topic,
            index,
            body.clone(),
            group_key.as_deref(),
            event_properties,
        );
        let payload = serde_json::to_vec(&event)?;
        Ok(Self {
            message_id,
            label,
            body,
            properties,
            group_key,
            payload,
        })
    }

    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &MessageTemplate {
        &self.body
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.body.delay_seconds))
    }

    pub fn properties(&self) -> &[MessageProperty] {
        &self.properties
    }

    pub fn group_key(&self) -> Option<&str> {
        self.group_key.as_deref()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// 估算的线上大小：负载 + 属性键值字节数
    pub fn size_hint(&self) -> usize {
        self.payload.len()
            + self
                .properties
                .iter()
                .map(|p| p.key.len() + p.value.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_wire_json() {
        let body = MessageTemplate {
            content: Some("x".into()),
            delay_seconds: 3,
            ..Default::default()
        };
        let msg = OutboundMessage::new(body, "Message 1 of 1".into(), vec![], None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(msg.payload()).unwrap();
        assert_eq!(value["content"], "x");
        assert_eq!(value["delaySec"], 3);
        assert_eq!(msg.delay(), Duration::from_secs(3));
    }

    #[test]
    fn size_hint_counts_properties() {
        let props = vec![MessageProperty::new("k", "vv")];
        let msg =
            OutboundMessage::new(MessageTemplate::default(), "l".into(), props, None).unwrap();
        assert_eq!(msg.size_hint(), msg.payload().len() + 3);
    }

    #[test]
    fn event_grid_payload_wraps_body() {
        let body = MessageTemplate {
            content: Some("x".into()),
            ..Default::default()
        };
        let props = vec![MessageProperty::new("priority", "high")];
        let msg = OutboundMessage::event_grid(
            body.clone(),
            "Message 1 of 1".into(),
            props,
            Some("g".into()),
            "orders",
            0,
        )
        .unwrap();

        let event: EventGridMessage = serde_json::from_slice(msg.payload()).unwrap();
        assert_eq!(event.id, msg.message_id().to_string());
        assert_eq!(event.subject, "orders/MessagePublished/1/high");
        assert_eq!(event.data.message, body);
        assert_eq!(event.data.group_id, "g");
        assert_eq!(msg.body(), &body);
    }

    #[test]
    fn each_message_gets_a_fresh_id() {
        let a = OutboundMessage::new(MessageTemplate::default(), "l".into(), vec![], None).unwrap();
        let b = OutboundMessage::new(MessageTemplate::default(), "l".into(), vec![], None).unwrap();
        assert_ne!(a.message_id(), b.message_id());
    }
}
