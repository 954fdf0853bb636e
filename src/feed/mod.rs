//! Feed listener: Kafka notifications naming files to review.
//!
//! [`KafkaFeed`] owns the consumer session; [`FeedListener`] drives the
//! read → review loop over any [`NotificationSource`].

pub mod kafka;
pub mod listener;
pub mod traits;

pub use kafka::KafkaFeed;
pub use listener::{FeedListener, ListenerStats};
pub use traits::{Notification, NotificationSource};
