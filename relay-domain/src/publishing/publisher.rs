//! 批量发布器（BatchPublisher）
//!
//! 一次 `publish` 调用内顺序地派生消息、装入批次并发送；批次与计数均为调用内局部状态，
//! 多个并发调用只共享中间件客户端本身。
//!
use super::Deadline;
use crate::broker::{BatchOptions, BrokerClient, MessageBatch};
use crate::config::PublisherConfig;
use crate::error::{DomainError, DomainResult as Result};
use crate::message::PublishRequest;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 发布结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    /// 请求的消息条数
    pub requested: usize,
    /// 已成功发送的条数（各次发送批次大小之和）
    pub sent: usize,
    /// 发送的批次数
    pub batches: usize,
    /// 是否因截止时间/取消而提前结束
    pub timed_out: bool,
}

impl PublishOutcome {
    fn new(requested: usize) -> Self {
        Self {
            requested,
            sent: 0,
            batches: 0,
            timed_out: false,
        }
    }
}

pub struct BatchPublisher<B> {
    broker: Arc<B>,
    config: PublisherConfig,
}

impl<B> BatchPublisher<B>
where
    B: BrokerClient,
{
    pub fn new(broker: Arc<B>, config: PublisherConfig) -> Self {
        Self { broker, config }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// 展开请求并分批发送
    ///
    /// - 请求缺少消息模板、条数为 0 或 `Timeout` 属性非法时返回校验错误，不发生任何发送；
    /// - 截止时间到期不是错误：返回 `timed_out = true` 与部分 `sent`；
    /// - 超大消息返回 `OversizedMessage`，其中携带终止前已发送的条数。
    pub async fn publish(
        &self,
        request: &PublishRequest,
        token: &CancellationToken,
    ) -> Result<PublishOutcome> {
        let template = request.validate()?;
        let timeout = request
            .timeout_override()?
            .unwrap_or(self.config.default_timeout);
        let deadline = Deadline::after(timeout, token);

        let total = request.count();
        let options = BatchOptions {
            partition_key: request.group_key().map(str::to_string),
        };
        let mut outcome = PublishOutcome::new(total);
        let mut batch = self.broker.create_batch(&options).await?;

        for index in 0..total {
            if deadline.expired() {
                outcome.timed_out = true;
                break;
            }

            let message =
                request.outbound_as(self.config.format, &self.config.target, template, index)?;
            if batch.try_add(&message) {
                continue;
            }

            // 当前批次已满：发送后在新批次中重试同一条消息
            if !batch.is_empty() {
                let fresh = self.broker.create_batch(&options).await?;
                let full = std::mem::replace(&mut batch, fresh);
                self.flush(full, &mut outcome, token).await?;

                if batch.try_add(&message) {
                    continue;
                }
            }

            error!(
                target_name = %self.config.target,
                index = index + 1,
                size = message.size_hint(),
                sent = outcome.sent,
                "Message is too large for an empty batch"
            );
            return Err(DomainError::OversizedMessage {
                index,
                sent: outcome.sent,
            });
        }

        if !batch.is_empty() {
            if deadline.expired() {
                outcome.timed_out = true;
            } else {
                self.flush(batch, &mut outcome, token).await?;
            }
        }

        if outcome.timed_out {
            warn!(
                target_name = %self.config.target,
                timeout_secs = deadline.timeout().as_secs(),
                sent = outcome.sent,
                total,
                "Sending operation was canceled after timeout"
            );
        } else {
            info!(
                target_name = %self.config.target,
                sent = outcome.sent,
                total,
                batches = outcome.batches,
                "Successfully sent messages"
            );
        }

        Ok(outcome)
    }

    async fn flush(
        &self,
        batch: B::Batch,
        outcome: &mut PublishOutcome,
        token: &CancellationToken,
    ) -> Result<()> {
        let size = batch.len();
        if let Err(err) = self.broker.send(batch, token).await {
            error!(
                target_name = %self.config.target,
                sent = outcome.sent,
                error = %err,
                "Error sending batch"
            );
            return Err(err);
        }
        outcome.sent += size;
        outcome.batches += 1;
        debug!(target_name = %self.config.target, size, sent = outcome.sent, "Batch sent");
        Ok(())
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use crate::broker::{BatchLimits, InMemoryBroker};
    use crate::message::{MessageProperty, MessageTemplate};
    use std::time::Duration;

    fn request(count: usize) -> PublishRequest {
        PublishRequest::builder()
            .count(count)
            .body(MessageTemplate {
                content: Some("hi".into()),
                ..Default::default()
            })
            .build()
    }

    fn publisher(broker: &InMemoryBroker) -> BatchPublisher<InMemoryBroker> {
        BatchPublisher::new(Arc::new(broker.clone()), PublisherConfig::default())
    }

    #[tokio::test]
    async fn missing_body_performs_no_send() {
        let broker = InMemoryBroker::new(BatchLimits::messages(2));
        let req = PublishRequest::builder().count(3).build();

        let result = publisher(&broker)
            .publish(&req, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(broker.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn fits_in_single_batch() {
        let broker = InMemoryBroker::new(BatchLimits::default());
        let outcome = publisher(&broker)
            .publish(&request(5), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.sent, 5);
        assert_eq!(outcome.batches, 1);
        assert!(!outcome.timed_out);
        assert_eq!(broker.batch_sizes(), vec![5]);
    }

    #[tokio::test]
    async fn group_key_becomes_batch_partition_key() {
        let broker = InMemoryBroker::new(BatchLimits::messages(1));
        let req = PublishRequest::builder()
            .count(2)
            .group_key("orders".to_string())
            .body(MessageTemplate::default())
            .build();

        publisher(&broker)
            .publish(&req, &CancellationToken::new())
            .await
            .unwrap();

        let options = broker.sent_options();
        assert_eq!(options.len(), 2);
        assert!(
            options
                .iter()
                .all(|o| o.partition_key.as_deref() == Some("orders"))
        );
    }

    #[tokio::test]
    async fn oversized_first_message_sends_nothing() {
        let broker = InMemoryBroker::new(BatchLimits::bytes(8));
        let result = publisher(&broker)
            .publish(&request(3), &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(DomainError::OversizedMessage { index: 0, sent: 0 })
        ));
        assert!(broker.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn transport_error_is_propagated() {
        let broker = InMemoryBroker::new(BatchLimits::messages(2));
        broker.fail_sends_with("connection reset");

        let result = publisher(&broker)
            .publish(&request(3), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(DomainError::Transport { .. })));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_first_message() {
        let broker = InMemoryBroker::new(BatchLimits::messages(2));
        let token = CancellationToken::new();
        token.cancel();

        let outcome = publisher(&broker).publish(&request(3), &token).await.unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.sent, 0);
        assert!(broker.batch_sizes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_property_bounds_the_run() {
        let broker = InMemoryBroker::new(BatchLimits::messages(2))
            .with_send_latency(Duration::from_secs(1));
        let req = PublishRequest::builder()
            .count(10)
            .properties(vec![MessageProperty::new("Timeout", "2")])
            .body(MessageTemplate::default())
            .build();

        let outcome = publisher(&broker)
            .publish(&req, &CancellationToken::new())
            .await
            .unwrap();

        // 两次发送各耗时 1 秒，第三批尚未发送时已到期
        assert!(outcome.timed_out);
        assert_eq!(outcome.sent, 4);
        assert_eq!(broker.batch_sizes(), vec![2, 2]);
    }

    #[tokio::test]
    async fn event_grid_format_sends_message_sent_events() {
        use crate::config::PayloadFormat;
        use crate::message::EventGridMessage;

        let broker = InMemoryBroker::new(BatchLimits::messages(10));
        let config = PublisherConfig::builder()
            .target("orders")
            .format(PayloadFormat::EventGrid)
            .build();
        let req = PublishRequest::builder()
            .count(2)
            .properties(vec![MessageProperty::new("priority", "low")])
            .body(MessageTemplate {
                content: Some("hi".into()),
                ..Default::default()
            })
            .build();

        let outcome = BatchPublisher::new(Arc::new(broker.clone()), config)
            .publish(&req, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.sent, 2);

        let events: Vec<EventGridMessage> = broker
            .sent_messages()
            .iter()
            .map(|m| serde_json::from_slice(m.payload()).unwrap())
            .collect();
        assert_eq!(events[1].subject, "orders/MessagePublished/2/low");
        assert_eq!(events[1].event_type, "MessageSent");
        assert_eq!(
            events[1].data.message.content.as_deref(),
            Some("hi (Message 2 of 2)")
        );
    }
}
