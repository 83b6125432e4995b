//! 领域层统一错误定义
//!
//! 覆盖请求校验、分区校验、超大消息、传输失败与序列化等最小必要集合。
//! 截止时间到期不属于错误，由 `PublishOutcome::timed_out` 表达。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 客户端错误（未发生任何 I/O） ---
    #[error("validation error: {reason}")]
    Validation { reason: String },
    #[error("invalid partition id: {partition_id}. Available partitions: {}", .available.join(", "))]
    InvalidPartition {
        partition_id: String,
        available: Vec<String>,
    },

    // --- 发布 ---
    #[error("message {} is too large for the batch and cannot be sent (sent before abort: {sent})", .index + 1)]
    OversizedMessage { index: usize, sent: usize },

    // --- 传输/中间件 ---
    #[error("transport error: {reason}")]
    Transport { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl DomainError {
    pub fn validation(reason: impl Into<String>) -> Self {
        DomainError::Validation {
            reason: reason.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        DomainError::Transport {
            reason: reason.into(),
        }
    }

    /// 是否为调用方输入导致的错误（对外映射为客户端错误）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. } | DomainError::InvalidPartition { .. }
        )
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
