use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::topics::Topic;
use crate::constants::DEFAULT_EVENT_CAPACITY;

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Event that has been published
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedEvent {
    pub topic: Topic,
    pub payload: Value,
    pub published_at: DateTime<Utc>,
}

/// Sink for topic payloads. Delivery is fire-and-forget: the engine never
/// learns whether anyone received a message.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, topic: Topic, payload: Value) -> Result<(), PublishError>;
}

/// Serialize `payload` and publish it on `topic`
pub async fn publish_json<P, T>(publisher: &P, topic: Topic, payload: &T) -> Result<(), PublishError>
where
    P: TopicPublisher + ?Sized,
    T: Serialize + Sync,
{
    let value = serde_json::to_value(payload)?;
    publisher.publish(topic, value).await
}

/// Counters kept by [`EventPublisher`]
#[derive(Debug, Default)]
pub struct EventPublisherStats {
    published: AtomicU64,
    undelivered: AtomicU64,
}

/// Point-in-time copy of [`EventPublisherStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventPublisherSnapshot {
    pub published: u64,
    /// Published while nobody was subscribed
    pub undelivered: u64,
}

impl EventPublisherStats {
    pub fn snapshot(&self) -> EventPublisherSnapshot {
        EventPublisherSnapshot {
            published: self.published.load(Ordering::Relaxed),
            undelivered: self.undelivered.load(Ordering::Relaxed),
        }
    }
}

/// In-process topic publisher backed by a broadcast channel
///
/// ```rust
/// use opsfeed_core::events::{EventPublisher, Topic, TopicPublisher};
/// use serde_json::json;
///
/// tokio_test::block_on(async {
///     let publisher = EventPublisher::new(16);
///     let mut rx = publisher.subscribe();
///
///     publisher.publish(Topic::Health, json!({"status": "healthy"})).await.unwrap();
///
///     let event = rx.recv().await.unwrap();
///     assert_eq!(event.topic, Topic::Health);
///     assert_eq!(publisher.stats().undelivered, 0);
/// });
/// ```
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
    stats: Arc<EventPublisherStats>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            stats: Arc::new(EventPublisherStats::default()),
        }
    }

    /// Subscribe to events on every topic
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn stats(&self) -> EventPublisherSnapshot {
        self.stats.snapshot()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[async_trait]
impl TopicPublisher for EventPublisher {
    async fn publish(&self, topic: Topic, payload: Value) -> Result<(), PublishError> {
        let event = PublishedEvent {
            topic,
            payload,
            published_at: Utc::now(),
        };

        self.stats.published.fetch_add(1, Ordering::Relaxed);

        // send() only fails when there are no subscribers, which is fine here
        if self.sender.send(event).is_err() {
            self.stats.undelivered.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::new(8);
        publisher
            .publish(Topic::Health, json!({"status": "unknown"}))
            .await
            .unwrap();

        let stats = publisher.stats();
        assert_eq!(stats.published, 1);
        assert_eq!(stats.undelivered, 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_topic_and_payload() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 1);

        publish_json(&publisher, Topic::TaskSummary, &json!({"total": 0}))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, Topic::TaskSummary);
        assert_eq!(event.payload["total"], 0);
        assert_eq!(publisher.stats().undelivered, 0);
    }

    #[tokio::test]
    async fn test_publish_through_trait_object() {
        let publisher: Arc<dyn TopicPublisher> = Arc::new(EventPublisher::default());
        publish_json(publisher.as_ref(), Topic::NewAlert, &vec![1, 2, 3])
            .await
            .unwrap();
    }
}
