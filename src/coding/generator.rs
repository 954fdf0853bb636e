//! External-process [`Generator`].
//!
//! Launches `<command> [args...] --model=<model> --prompt=<prompt>`,
//! streams the source file to stdin and captures stdout and stderr
//! through a single pipe, so the bytes land in the order the child
//! wrote them.

use std::io::Read;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::traits::Generator;
use crate::config::GeneratorConfig;

/// How much of a failed run's output ends up in the error message.
const ERROR_TAIL_BYTES: usize = 512;

pub struct ExternalGenerator {
    command: String,
    args: Vec<String>,
}

impl ExternalGenerator {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    fn build_command(&self, model: &str, prompt: &str) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(format!("--model={model}"))
            .arg(format!("--prompt={prompt}"));
        cmd
    }
}

#[async_trait]
impl Generator for ExternalGenerator {
    fn name(&self) -> &str {
        &self.command
    }

    async fn run(&self, input: &[u8], model: &str, prompt: &str) -> anyhow::Result<Vec<u8>> {
        let (mut reader, writer) = std::io::pipe().context("failed to create output pipe")?;
        let stderr_writer = writer
            .try_clone()
            .context("failed to share output pipe with stderr")?;

        let mut cmd = self.build_command(model, prompt);
        cmd.stdin(Stdio::piped())
            .stdout(writer)
            .stderr(stderr_writer)
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to launch generator `{}`", self.command))?;
        // `cmd` still holds the parent's copies of the write end; the
        // reader only sees EOF once they are gone.
        drop(cmd);

        let collector = tokio::task::spawn_blocking(move || {
            let mut output = Vec::new();
            reader.read_to_end(&mut output).map(|_| output)
        });

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input).await {
                Ok(()) => {}
                // The child may exit without consuming all of stdin.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(generator = %self.command, "Generator closed stdin early");
                }
                Err(e) => {
                    return Err(e).context("failed to stream source file to generator stdin");
                }
            }
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("failed waiting for generator `{}`", self.command))?;
        let output = collector
            .await
            .context("generator output collector stopped")?
            .context("failed to read generator output")?;

        if !status.success() {
            anyhow::bail!(
                "generator `{}` {status}: {}",
                self.command,
                output_tail(&output)
            );
        }

        Ok(output)
    }
}

fn output_tail(output: &[u8]) -> String {
    let start = output.len().saturating_sub(ERROR_TAIL_BYTES);
    String::from_utf8_lossy(&output[start..]).trim().to_string()
}
