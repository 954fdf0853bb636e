//! Feed listener: read one notification, review it, read the next.
//!
//! Strictly sequential. A notification is fully processed (review written
//! or failure logged) before the next read is issued, so per-partition
//! order is preserved end to end. Cancelling interrupts the review in
//! flight: its future is dropped, which kills the generator child.

use tokio_util::sync::CancellationToken;

use super::traits::NotificationSource;
use crate::coding::ReviewStage;

/// Counters reported when the listener stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub received: u64,
    pub reviewed: u64,
    pub skipped: u64,
    pub interrupted: u64,
    pub receive_errors: u64,
}

pub struct FeedListener<S> {
    source: S,
    stage: ReviewStage,
}

impl<S: NotificationSource> FeedListener<S> {
    pub fn new(source: S, stage: ReviewStage) -> Self {
        Self { source, stage }
    }

    /// Run until `cancel` fires, then close the source.
    pub async fn run(&self, cancel: CancellationToken) -> ListenerStats {
        let mut stats = ListenerStats::default();
        tracing::info!(source = self.source.name(), "Waiting for messages...");

        while !cancel.is_cancelled() {
            let notification = match self.source.recv(&cancel).await {
                Ok(Some(notification)) => notification,
                Ok(None) => break,
                Err(e) => {
                    stats.receive_errors += 1;
                    tracing::warn!(error = %format!("{e:#}"), "Consumer error");
                    continue;
                }
            };

            stats.received += 1;
            tracing::info!(
                path = %notification.path.display(),
                topic = %notification.topic,
                partition = notification.partition,
                offset = notification.offset,
                "Received file path"
            );

            tokio::select! {
                result = self.stage.process(&notification.path) => match result {
                    Ok(_) => stats.reviewed += 1,
                    Err(_) => stats.skipped += 1,
                },
                _ = cancel.cancelled() => {
                    stats.interrupted += 1;
                    tracing::warn!(
                        path = %notification.path.display(),
                        offset = notification.offset,
                        "Review interrupted by shutdown"
                    );
                }
            }
        }

        self.source.close().await;
        tracing::info!(
            received = stats.received,
            reviewed = stats.reviewed,
            skipped = stats.skipped,
            interrupted = stats.interrupted,
            receive_errors = stats.receive_errors,
            "Feed listener stopped"
        );
        stats
    }
}
