//! Trait definitions for the review pipeline stage.
//!
//! The stage only knows the [`Generator`] capability; the concrete
//! external-process implementation lives in [`super::generator`] and
//! tests substitute an in-memory one.

use std::path::PathBuf;

use async_trait::async_trait;

// ── Generator capability ─────────────────────────────────────────

/// Something that turns a source file into review text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Generate a review of `input` with `model` following `prompt`.
    ///
    /// Returns the raw output bytes. Any error means nothing is written.
    async fn run(&self, input: &[u8], model: &str, prompt: &str) -> anyhow::Result<Vec<u8>>;
}

// ── Stage outcome ────────────────────────────────────────────────

/// Step of [`super::ReviewStage::process`] that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStep {
    Read,
    Generate,
    Write,
}

impl StageStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Generate => "generate",
            Self::Write => "write",
        }
    }
}

impl std::fmt::Display for StageStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal failure of one notification. Every variant means no review
/// file was produced for `path`.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("generator failed for {path}: {message}")]
    Generate { path: PathBuf, message: String },
    #[error("failed to write {output}: {source}")]
    Write {
        path: PathBuf,
        output: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StageError {
    pub fn step(&self) -> StageStep {
        match self {
            Self::Read { .. } => StageStep::Read,
            Self::Generate { .. } => StageStep::Generate,
            Self::Write { .. } => StageStep::Write,
        }
    }

    /// The source file this error belongs to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } | Self::Generate { path, .. } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_labels() {
        assert_eq!(StageStep::Read.to_string(), "read");
        assert_eq!(StageStep::Generate.to_string(), "generate");
        assert_eq!(StageStep::Write.to_string(), "write");
    }

    #[test]
    fn error_reports_step_and_path() {
        let err = StageError::Generate {
            path: PathBuf::from("/data/a.rs"),
            message: "exit status: 2".into(),
        };
        assert_eq!(err.step(), StageStep::Generate);
        assert_eq!(err.path(), std::path::Path::new("/data/a.rs"));
        assert!(err.to_string().contains("exit status: 2"));
    }

    #[test]
    fn read_error_keeps_io_source() {
        let err = StageError::Read {
            path: PathBuf::from("/missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.step(), StageStep::Read);
    }
}
