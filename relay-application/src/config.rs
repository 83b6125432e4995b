use crate::telemetry::LoggingConfig;
use config::{Config, ConfigError, Environment};
use relay_domain::config::{PayloadFormat, PublisherConfig, ReaderConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 中继服务配置（环境变量前缀 `RELAY_`）
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RelayConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 以 JSON 格式输出日志
    #[serde(default)]
    pub log_json: bool,

    /// 中间件命名空间（如 `myhub.servicebus.windows.net`）
    #[serde(default)]
    pub namespace: String,

    /// 发布目标主题/队列
    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    /// 读取分区日志时使用的消费组
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,

    /// 出站负载形态：`template` 或 `event_grid`
    #[serde(default)]
    pub publish_format: PayloadFormat,

    /// 发布的默认截止时长（秒）
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,

    /// 读取的默认结果上限
    #[serde(default = "default_read_max_results")]
    pub read_max_results: usize,

    /// 单分区提前终止阈值
    #[serde(default = "default_read_early_stop_threshold")]
    pub read_early_stop_threshold: usize,

    /// 单次拉取最长等待（秒）
    #[serde(default = "default_read_max_wait_secs")]
    pub read_max_wait_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_topic_name() -> String {
    "messages".to_string()
}

fn default_consumer_group() -> String {
    "$Default".to_string()
}

fn default_publish_timeout_secs() -> u64 {
    30
}

fn default_read_max_results() -> usize {
    100
}

fn default_read_early_stop_threshold() -> usize {
    100
}

fn default_read_max_wait_secs() -> u64 {
    5
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("RELAY"))
            .build()?
            .try_deserialize()
    }

    pub fn publisher_config(&self) -> PublisherConfig {
        PublisherConfig::builder()
            .target(self.topic_name.clone())
            .default_timeout(Duration::from_secs(self.publish_timeout_secs))
            .format(self.publish_format)
            .build()
    }

    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::builder()
            .default_max_results(self.read_max_results)
            .early_stop_threshold(self.read_early_stop_threshold)
            .max_wait_time(Duration::from_secs(self.read_max_wait_secs))
            .build()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            json: self.log_json,
        }
    }
}
