//! Bronze Extract - MongoDB to PostgreSQL staging extraction tool

use anyhow::{bail, Result};
use bronze_common::logging::{init_logging, LogConfig, LogLevel};
use bronze_extract::{Config, Pipeline};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bronze-extract")]
#[command(author, version, about = "Extract MongoDB collections into a PostgreSQL staging schema")]
struct Cli {
    /// Keep extracting remaining collections when one fails
    #[arg(long, env = "BRONZE_CONTINUE_ON_ERROR")]
    continue_on_error: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    log_config.log_file_prefix = "bronze-extract".to_string();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    let _log_guard = init_logging(&log_config)?;

    let config = Config::load()?;

    let pipeline = Pipeline::connect(&config)
        .await?
        .with_continue_on_error(cli.continue_on_error);

    let result = pipeline.run().await;
    pipeline.close().await;
    let summary = result?;

    for failure in &summary.failed {
        warn!(
            collection = %failure.collection,
            reason = %failure.reason,
            "Collection was not extracted"
        );
    }

    info!(
        collections = summary.completed.len(),
        failed = summary.failed.len(),
        documents = summary.total_documents(),
        extracted_at = %summary.extracted_at,
        "Extraction complete"
    );

    if !summary.failed.is_empty() {
        bail!("{} collection(s) failed to extract", summary.failed.len());
    }

    Ok(())
}
