use relay_domain::broker::{BatchLimits, BatchOptions, BrokerClient, InMemoryBroker, MessageBatch};
use relay_domain::config::PublisherConfig;
use relay_domain::error::{DomainError, DomainResult};
use relay_domain::message::{MessageProperty, MessageTemplate, OutboundMessage, PublishRequest};
use relay_domain::publishing::BatchPublisher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

fn request(count: usize, content: &str) -> PublishRequest {
    PublishRequest::builder()
        .count(count)
        .properties(vec![
            MessageProperty::new("priority", "high"),
            MessageProperty::new("content-type", "application/json"),
        ])
        .body(MessageTemplate {
            recipient: Some("team".into()),
            subject: Some("report".into()),
            content: Some(content.into()),
            delay_seconds: 4,
        })
        .build()
}

async fn publish(
    broker: &InMemoryBroker,
    req: &PublishRequest,
) -> DomainResult<relay_domain::publishing::PublishOutcome> {
    BatchPublisher::new(Arc::new(broker.clone()), PublisherConfig::default())
        .publish(req, &CancellationToken::new())
        .await
}

/// 记录每次 `try_add` 与 `send` 的批次，用于核对刷新计数
#[derive(Clone, Default)]
struct CountingBroker {
    capacity: usize,
    created: Arc<AtomicUsize>,
    flushed: Arc<Mutex<Vec<usize>>>,
}

struct CountingBatch {
    capacity: usize,
    count: usize,
}

impl MessageBatch for CountingBatch {
    fn try_add(&mut self, _message: &OutboundMessage) -> bool {
        if self.count == self.capacity {
            return false;
        }
        self.count += 1;
        true
    }

    fn len(&self) -> usize {
        self.count
    }
}

#[async_trait::async_trait]
impl BrokerClient for CountingBroker {
    type Batch = CountingBatch;

    async fn create_batch(&self, _options: &BatchOptions) -> DomainResult<CountingBatch> {
        self.created.fetch_add(1, Ordering::Relaxed);
        Ok(CountingBatch {
            capacity: self.capacity,
            count: 0,
        })
    }

    async fn send(&self, batch: CountingBatch, _token: &CancellationToken) -> DomainResult<()> {
        self.flushed.lock().unwrap().push(batch.count);
        Ok(())
    }
}

#[tokio::test]
async fn three_messages_with_capacity_two_send_two_batches() {
    let broker = InMemoryBroker::new(BatchLimits::messages(2));
    let req = PublishRequest::builder()
        .count(3)
        .body(MessageTemplate {
            content: Some("hi".into()),
            ..Default::default()
        })
        .build();

    let outcome = publish(&broker, &req).await.unwrap();

    assert_eq!(broker.batch_sizes(), vec![2, 1]);
    assert_eq!(outcome.sent, 3);
    assert_eq!(outcome.batches, 2);
    assert!(!outcome.timed_out);

    let contents: Vec<String> = broker
        .sent_messages()
        .iter()
        .map(|m| m.body().content.clone().unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![
            "hi (Message 1 of 3)",
            "hi (Message 2 of 3)",
            "hi (Message 3 of 3)"
        ]
    );
}

#[tokio::test]
async fn sends_exactly_count_distinct_messages() {
    for (count, capacity) in [(1, 1), (7, 3), (10, 10), (25, 4)] {
        let broker = InMemoryBroker::new(BatchLimits::messages(capacity));
        let outcome = publish(&broker, &request(count, "x")).await.unwrap();

        let sent = broker.sent_messages();
        assert_eq!(outcome.sent, count);
        assert_eq!(sent.len(), count);

        let mut ids: Vec<_> = sent.iter().map(|m| m.message_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count, "message ids must be distinct");
    }
}

#[tokio::test]
async fn flushed_batch_counts_sum_to_sent() {
    let broker = CountingBroker {
        capacity: 3,
        ..Default::default()
    };
    let publisher = BatchPublisher::new(Arc::new(broker.clone()), PublisherConfig::default());

    let outcome = publisher
        .publish(&request(11, "y"), &CancellationToken::new())
        .await
        .unwrap();

    let flushed = broker.flushed.lock().unwrap().clone();
    assert_eq!(flushed, vec![3, 3, 3, 2]);
    assert_eq!(flushed.iter().sum::<usize>(), outcome.sent);
    assert_eq!(outcome.batches, flushed.len());
    // 初始批次 + 每次刷新后重开的批次
    assert_eq!(broker.created.load(Ordering::Relaxed), 4);
}

#[tokio::test]
async fn message_larger_than_batch_capacity_is_an_oversize_error() {
    let broker = InMemoryBroker::new(BatchLimits::bytes(16));
    let result = publish(&broker, &request(2, &"z".repeat(64))).await;

    assert!(matches!(
        result,
        Err(DomainError::OversizedMessage { index: 0, sent: 0 })
    ));
    assert!(broker.sent_messages().is_empty());
}

#[tokio::test]
async fn oversize_mid_run_reports_partial_sent_count() {
    // 容量恰好容纳第 1 条消息；“Message 10 of 10” 比前 9 条多 1 字节
    let req = request(10, "payload");
    let template = req.validate().unwrap();
    let first = req.outbound(template, 0).unwrap();
    let broker = InMemoryBroker::new(BatchLimits::bytes(first.size_hint()));

    let result = publish(&broker, &req).await;

    assert!(matches!(
        result,
        Err(DomainError::OversizedMessage { index: 9, sent: 9 })
    ));
    assert_eq!(broker.batch_sizes(), vec![1; 9]);
}

#[tokio::test]
async fn identical_input_yields_identical_content_sequences() {
    let req = request(5, "same");
    let a = InMemoryBroker::new(BatchLimits::messages(2));
    let b = InMemoryBroker::new(BatchLimits::messages(2));

    publish(&a, &req).await.unwrap();
    publish(&b, &req).await.unwrap();

    let shape = |broker: &InMemoryBroker| -> Vec<(MessageTemplate, u32, Vec<MessageProperty>, String)> {
        broker
            .sent_messages()
            .into_iter()
            .map(|m| {
                (
                    m.body().clone(),
                    m.body().delay_seconds,
                    m.properties().to_vec(),
                    m.label().to_string(),
                )
            })
            .collect()
    };
    assert_eq!(shape(&a), shape(&b));

    let ids_a: Vec<_> = a.sent_messages().iter().map(|m| m.message_id()).collect();
    let ids_b: Vec<_> = b.sent_messages().iter().map(|m| m.message_id()).collect();
    assert_ne!(ids_a, ids_b);
}

#[tokio::test]
async fn properties_and_delay_are_carried_on_every_message() {
    let broker = InMemoryBroker::new(BatchLimits::messages(4));
    publish(&broker, &request(6, "p")).await.unwrap();

    for (i, msg) in broker.sent_messages().iter().enumerate() {
        assert_eq!(msg.properties()[0], MessageProperty::new("priority", "high"));
        assert_eq!(msg.delay().as_secs(), 4);
        assert_eq!(msg.label(), format!("report {} of 6", i + 1));
    }
}
