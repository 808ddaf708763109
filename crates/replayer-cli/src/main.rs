use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use replayer_core::app::{self, Replayer};
use replayer_core::config::ReplayConfig;
use replayer_core::impls::{FileRecording, HttpTransport};

/// Replay a recorded request corpus against live endpoints.
#[derive(Debug, Parser)]
#[command(name = "replayer", version)]
struct Cli {
    /// Recording file: a JSON array of double-encoded envelope records.
    recording: PathBuf,

    /// TOML config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of requests in flight at once.
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Number of passes over the recording.
    #[arg(short = 'r', long)]
    rounds: Option<u32>,

    /// Whole-request timeout applied by the HTTP client.
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn replay_config(&self) -> Result<ReplayConfig> {
        let mut config = match &self.config {
            Some(path) => ReplayConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReplayConfig::default(),
        };
        if let Some(concurrency) = self.concurrency {
            config.concurrency_limit = concurrency;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(timeout) = self.request_timeout_ms {
            config.transport.request_timeout_ms = Some(timeout);
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the report, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.replay_config()?;

    let source = FileRecording::new(&cli.recording);
    let recording = app::load(&source)
        .await
        .with_context(|| format!("loading recording {}", cli.recording.display()))?;

    let transport = Arc::new(HttpTransport::new(&config.transport)?);
    let replayer = Replayer::new(config, transport)?;

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling replay");
            on_signal.cancel();
        }
    });

    let report = replayer.run(recording, shutdown).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
