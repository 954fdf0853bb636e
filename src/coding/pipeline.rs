//! Review pipeline stage.
//!
//! Turns one source file into one review file:
//!
//! 1. **Read** the source file
//! 2. **Resolve** the model identifier (configured or default)
//! 3. **Generate** the review through the [`Generator`]
//! 4. **Write** the output next to the source as `<stem>_review<ext>`
//!
//! Every step is a terminal failure point for the notification. Nothing
//! is written unless generation succeeded, and nothing is retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::output_path::review_output_path;
use super::traits::{Generator, StageError};
use crate::config::ReviewConfig;

/// Permissions for newly created review files.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

pub struct ReviewStage {
    generator: Arc<dyn Generator>,
    config: ReviewConfig,
}

impl ReviewStage {
    pub fn new(generator: Arc<dyn Generator>, config: ReviewConfig) -> Self {
        Self { generator, config }
    }

    /// Process one source file. Failures are logged here; the caller only
    /// needs the result when it wants to count or report outcomes.
    pub async fn process(&self, path: &Path) -> Result<PathBuf, StageError> {
        tracing::info!(path = %path.display(), "Starting to process file");

        let result = self.run_steps(path).await;
        match &result {
            Ok(output) => tracing::info!(
                path = %path.display(),
                output = %output.display(),
                "Successfully processed and created review file"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                step = %e.step(),
                error = %e,
                "Review skipped"
            ),
        }
        result
    }

    async fn run_steps(&self, path: &Path) -> Result<PathBuf, StageError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| StageError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let model = self.config.resolve_model();
        if model.is_default {
            tracing::info!(model = %model.name, "No model configured, using default model");
        }
        tracing::info!(
            model = %model.name,
            generator = self.generator.name(),
            bytes = content.len(),
            "Generating review"
        );

        let output = self
            .generator
            .run(&content, &model.name, &self.config.prompt)
            .await
            .map_err(|e| StageError::Generate {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            })?;

        let output_path = review_output_path(path);
        tracing::debug!(output = %output_path.display(), "Writing review output");
        write_output(&output_path, &output)
            .await
            .map_err(|source| StageError::Write {
                path: path.to_path_buf(),
                output: output_path.clone(),
                source,
            })?;

        Ok(output_path)
    }
}

/// Create or truncate `path` and write `bytes` to it.
async fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(OUTPUT_MODE);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}

// ── Tests ────────────────────────────────────────────────────────
