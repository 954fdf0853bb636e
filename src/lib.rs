//! Kafka-fed code review stage.
//!
//! Each notification on the configured topic names a file. The file is
//! handed to an external review generator and the generator's output is
//! written next to it as `<stem>_review<ext>`.

pub mod coding;
pub mod config;
pub mod feed;
pub mod logging;
