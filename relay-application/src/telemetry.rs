use crate::error::AppError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 日志初始化配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 未设置 `RUST_LOG` 时使用的级别
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// 安装全局 tracing 订阅者；重复安装返回 `AppError::Infra`
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_current_span(true));
    let text_layer = (!config.json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| AppError::Infra(format!("failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_is_reported() {
        let config = LoggingConfig::default();
        let first = init_logging(&config);
        let second = init_logging(&config);
        // 同一进程内至多成功一次
        assert!(!(first.is_ok() && second.is_ok()));
        assert!(matches!(second, Err(AppError::Infra(_))));
    }
}
