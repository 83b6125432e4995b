//! 消息模型（message）
//!
//! - `MessageTemplate`：不可变的消息模板，N 条出站消息均由其派生；
//! - `PublishRequest`：一次批量发布请求（数量、分组键、属性与模板）；
//! - `OutboundMessage`：发布循环内按序号派生的单条出站消息；
//! - `EventGridMessage`：以 Event Grid 事件形态发布/读取时的负载。
//!
mod event_grid;
mod outbound;
mod request;
mod template;

pub use event_grid::{
    EVENT_DATA_VERSION, EVENT_METADATA_VERSION, EventGridData, EventGridMessage,
    MESSAGE_SENT_EVENT_TYPE, PRIORITY_PROPERTY,
};
pub use outbound::OutboundMessage;
pub use request::{MessageProperty, PublishRequest, TIMEOUT_PROPERTY};
pub use template::MessageTemplate;
