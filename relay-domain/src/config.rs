//! 核心组件配置
//!
//! 以显式配置注入批量发布器与分区读取器的构造函数，不做任何全局查找。
//!
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 出站负载形态
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// 消息模板 JSON（`recipient`/`subject`/`content`/`delaySec`）
    #[default]
    Template,
    /// Event Grid `MessageSent` 事件，模板位于 `data.message`
    EventGrid,
}

/// 批量发布配置
#[derive(Clone, Debug, Builder)]
pub struct PublisherConfig {
    /// 目标主题/队列名称（仅用于日志与审计）
    #[builder(into, default = "messages".to_string())]
    pub target: String,
    /// 请求未携带 `Timeout` 属性时使用的整体截止时长
    #[builder(default = Duration::from_secs(30))]
    pub default_timeout: Duration,
    #[builder(default)]
    pub format: PayloadFormat,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// 分区读取配置
#[derive(Clone, Copy, Debug, Builder)]
pub struct ReaderConfig {
    /// 未指定 `maxResults` 时的默认结果上限
    #[builder(default = 100)]
    pub default_max_results: usize,
    /// 单分区连续检视多少条候选记录仍无有效记录时放弃该分区
    #[builder(default = 100)]
    pub early_stop_threshold: usize,
    /// 单次拉取的最长等待时间（透传给日志客户端）
    #[builder(default = Duration::from_secs(5))]
    pub max_wait_time: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_given_fields() {
        let publisher = PublisherConfig::builder()
            .default_timeout(Duration::from_secs(2))
            .build();
        assert_eq!(publisher.target, "messages");
        assert_eq!(publisher.default_timeout, Duration::from_secs(2));
        assert_eq!(publisher.format, PayloadFormat::Template);

        let reader = ReaderConfig::builder().early_stop_threshold(10).build();
        assert_eq!(reader.default_max_results, 100);
        assert_eq!(reader.early_stop_threshold, 10);
    }

    #[test]
    fn payload_format_uses_snake_case_names() {
        let format: PayloadFormat = serde_json::from_str("\"event_grid\"").unwrap();
        assert_eq!(format, PayloadFormat::EventGrid);
    }
}
