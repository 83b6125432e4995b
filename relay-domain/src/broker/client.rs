use crate::{error::DomainResult as Result, message::OutboundMessage};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 创建批次时的选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// 分区/会话亲和键；为空时由中间件自行分配
    pub partition_key: Option<String>,
}

/// 容量受限、保持顺序的消息批次
pub trait MessageBatch: Send {
    /// 尝试加入消息；超出传输层容量时返回 `false` 且批次保持不变
    fn try_add(&mut self, message: &OutboundMessage) -> bool;

    /// 当前批次内的消息条数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 消息中间件客户端：负责批次的创建与发送
#[async_trait]
pub trait BrokerClient: Send + Sync {
    type Batch: MessageBatch;

    async fn create_batch(&self, options: &BatchOptions) -> Result<Self::Batch>;

    /// 一次网络调用发送整个批次（至少一次语义，可能重复）
    async fn send(&self, batch: Self::Batch, token: &CancellationToken) -> Result<()>;
}
