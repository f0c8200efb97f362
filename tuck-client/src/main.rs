//! tuck - TU project report checker
//!
//! Uploads a PDF to the analysis service, shows a progress estimate while
//! the service works, and prints the categorized feedback.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tuck_client::services::{estimated_remaining_secs, progress_message};
use tuck_client::{report, Document, HttpAnalysisClient, SessionEvent, SessionSettings, UploadSession};
use tuck_common::{ClientConfig, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "tuck", version, about = "Check a project report PDF against TU format standards")]
struct Args {
    /// PDF file to analyze
    file: PathBuf,

    /// Analysis endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Number of pages the service analyzes
    #[arg(long)]
    max_pages: Option<u32>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long = "timeout")]
    timeout_secs: Option<u64>,

    /// Config file (default: platform config dir, tuck/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the normalized result as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid logging level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Print progress lines while a submit is in flight
fn spawn_progress_printer(mut rx: broadcast::Receiver<SessionEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SessionEvent::SubmitStarted { document, .. }) => {
                    eprintln!("Analyzing {} ...", document);
                }
                Ok(SessionEvent::ProgressUpdated { percent, .. }) if percent > 0.0 && percent < 100.0 => {
                    eprintln!(
                        "[{:>3.0}%] {} (about {}s remaining)",
                        percent,
                        progress_message(percent),
                        estimated_remaining_secs(percent)
                    );
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClientConfig::resolve(&ConfigOverrides {
        config_path: args.config.clone(),
        endpoint: args.endpoint.clone(),
        max_pages: args.max_pages,
        request_timeout_secs: args.timeout_secs,
    })?;

    init_tracing(&config.logging.level)?;
    info!("tuck {}", env!("CARGO_PKG_VERSION"));
    info!(endpoint = %config.endpoint, max_pages = config.max_pages, "Using analysis service");

    let transport = HttpAnalysisClient::from_config(&config)?;
    let session = UploadSession::new(Arc::new(transport), SessionSettings::from(&config));
    let printer = spawn_progress_printer(session.subscribe());

    let document = Document::from_path(&args.file)
        .await
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    session.select_file(document).await?;

    let outcome = session.submit().await;
    printer.abort();
    let result = outcome?;
    eprintln!("[100%] {}", progress_message(100.0));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", report::render(&result));
    }

    Ok(())
}
