//! Kafka-backed [`NotificationSource`].
//!
//! One consumer in one group, subscribed to one topic. Offsets are
//! auto-committed by librdkafka as messages are consumed, independently of
//! whether the review succeeds.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;
use tokio_util::sync::CancellationToken;

use super::traits::{Notification, NotificationSource};
use crate::config::BusConfig;

pub struct KafkaFeed {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaFeed {
    /// Create the consumer, subscribe, and confirm the brokers answer.
    ///
    /// Any error here is fatal at startup.
    pub async fn connect(config: &BusConfig) -> anyhow::Result<Self> {
        let consumer: StreamConsumer = client_config(config)
            .create()
            .context("Failed to create Kafka consumer")?;

        consumer
            .subscribe(&[config.topic.as_str()])
            .with_context(|| format!("Failed to subscribe to topic '{}'", config.topic))?;

        // librdkafka connects lazily; a metadata round trip surfaces an
        // unreachable cluster now instead of on the first read. The call
        // blocks, so it runs on the blocking pool.
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let topic = config.topic.clone();
        let (consumer, metadata) = tokio::task::spawn_blocking(move || {
            let metadata = consumer.fetch_metadata(Some(topic.as_str()), timeout);
            (consumer, metadata)
        })
        .await
        .context("Kafka metadata request stopped")?;
        metadata
            .with_context(|| format!("Failed to reach Kafka brokers at {}", config.brokers))?;

        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            group_id = %config.group_id,
            "Kafka consumer subscribed"
        );

        Ok(Self {
            consumer,
            topic: config.topic.clone(),
        })
    }
}

/// librdkafka properties for the consumer session.
pub fn client_config(config: &BusConfig) -> ClientConfig {
    let mut client = ClientConfig::new();
    client
        .set("bootstrap.servers", &config.brokers)
        .set("group.id", &config.group_id)
        .set("auto.offset.reset", &config.auto_offset_reset);
    for (key, value) in &config.properties {
        client.set(key, value);
    }
    client
}

#[async_trait]
impl NotificationSource for KafkaFeed {
    fn name(&self) -> &str {
        &self.topic
    }

    async fn recv(&self, cancel: &CancellationToken) -> anyhow::Result<Option<Notification>> {
        tokio::select! {
            _ = cancel.cancelled() => Ok(None),
            received = self.consumer.recv() => {
                let message = received.context("Kafka consumer error")?;
                Ok(Some(Notification::new(
                    message.payload(),
                    message.topic(),
                    message.partition(),
                    message.offset(),
                )))
            }
        }
    }

    async fn close(&self) {
        self.consumer.unsubscribe();
        tracing::info!(topic = %self.topic, "Kafka consumer closed");
    }
}
