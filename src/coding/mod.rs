//! Review pipeline stage: source file in, `<stem>_review<ext>` out.
//!
//! ## Architecture
//!
//! ```text
//! path ─▸ read ─▸ resolve model ─▸ Generator::run ─▸ write sibling
//!          │                            │                 │
//!          └──────── StageError (logged, notification dropped) ──┘
//! ```
//!
//! ## Extension
//!
//! Swap the review backend by implementing [`Generator`] and handing it
//! to [`ReviewStage::new`]. [`ExternalGenerator`] is the production one.

pub mod generator;
pub mod output_path;
pub mod pipeline;
pub mod traits;

pub use generator::ExternalGenerator;
pub use output_path::review_output_path;
pub use pipeline::ReviewStage;
pub use traits::{Generator, StageError, StageStep};
