//! CLI entry point for the fileferry tool.
//!
//! Illustrative usage of the library, not a stable interface.

use anyhow::Result;
use clap::Parser;
use fileferry::{SaveOutcome, TransferClient, UploadBatchOutcome};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(server = %args.server, username = %args.username, "CLI arguments parsed");

    let client = TransferClient::connect(&args.server, &args.username, &args.password).await?;

    match args.command {
        Command::Download { all, out } => {
            match fileferry::download_and_save(&client, &out, all).await? {
                SaveOutcome::Saved(path) => info!(path = %path.display(), "download complete"),
                SaveOutcome::NoContent => info!("nothing to download"),
                SaveOutcome::MissingPath(path) => {
                    anyhow::bail!("target path does not exist: {}", path.display())
                }
                SaveOutcome::Failed { status, reason } => {
                    anyhow::bail!("download failed: HTTP {status} {reason}")
                }
            }
        }
        Command::Upload { glob, path, dir } => {
            match fileferry::upload_from_path(&client, &glob, &path, &dir).await? {
                UploadBatchOutcome::Uploaded(count) => info!(count, "upload complete"),
                UploadBatchOutcome::MissingPath(path) => {
                    anyhow::bail!("source path does not exist: {}", path.display())
                }
            }
        }
    }

    Ok(())
}
