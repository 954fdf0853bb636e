use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bundle_reviewer::coding::{ExternalGenerator, ReviewStage};
use bundle_reviewer::config::{Config, ConfigLocation};
use bundle_reviewer::feed::{FeedListener, KafkaFeed};
use bundle_reviewer::logging;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// Review every file announced on a Kafka topic with an external generator.
#[derive(Parser, Debug)]
#[command(name = "bundle-reviewer", version, about, long_about = None)]
struct Cli {
    /// Path to config.toml (default: $BUNDLE_REVIEWER_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Consume notifications and review each named file (default)
    Run,
    /// Review local files once, without the message bus
    Review {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Print the resolved configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let config = ConfigLocation::resolve(cli.config)
        .load()
        .context("Invalid configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_feed(config).await,
        Commands::Review { files } => review_files(&config, &files).await,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn build_stage(config: &Config) -> ReviewStage {
    let generator = Arc::new(ExternalGenerator::from_config(&config.generator));
    ReviewStage::new(generator, config.review.clone())
}

async fn run_feed(config: Config) -> Result<()> {
    let feed = KafkaFeed::connect(&config.bus)
        .await
        .context("Failed to start Kafka consumer")?;
    let listener = FeedListener::new(feed, build_stage(&config));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    listener.run(cancel).await;
    Ok(())
}

async fn review_files(config: &Config, files: &[PathBuf]) -> Result<()> {
    let stage = build_stage(config);
    let mut failed = 0usize;
    for file in files {
        if stage.process(file).await.is_err() {
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) could not be reviewed", files.len());
    }
    Ok(())
}

/// First signal: cancel the feed, which also kills a running generator.
/// Second signal: exit immediately.
async fn cancel_on_signal(cancel: CancellationToken) {
    wait_for_signal().await;
    tracing::info!("Shutdown signal received, stopping the feed");
    cancel.cancel();

    wait_for_signal().await;
    tracing::warn!("Second shutdown signal received, exiting now");
    std::process::exit(130);
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM, only Ctrl-C will stop the feed");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
