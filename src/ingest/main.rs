//! Gazetteer ingest pipeline.
//!
//! Reads the header-schema file and raw CSV extracts, builds the
//! reference index, and writes a JSON snapshot for the query server.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use alder::index::{IndexSnapshot, ReferenceIndexBuilder};

use crate::config::IngestConfig;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the address reference index from gazetteer extracts")]
struct Args {
    /// TOML config file with ingest paths
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Header schema CSV (column names for the raw extracts)
    #[arg(long)]
    header: Option<PathBuf>,

    /// Directory of raw gazetteer CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output snapshot path (default: reference-index.json)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Alder Ingest Pipeline");

    // Config file supplies defaults; CLI flags override.
    let config = match &args.config {
        Some(path) => Some(IngestConfig::load_from_file(path)?),
        None => None,
    };

    let header = args
        .header
        .or_else(|| config.as_ref().map(|c| c.header_path.clone()))
        .context("No header schema given (use --header or a config file)")?;
    let data_dir = args
        .data_dir
        .or_else(|| config.as_ref().map(|c| c.data_dir.clone()))
        .context("No data directory given (use --data-dir or a config file)")?;
    let snapshot_path = args
        .snapshot
        .or_else(|| config.as_ref().and_then(|c| c.snapshot_path.clone()))
        .unwrap_or_else(|| PathBuf::from("reference-index.json"));

    info!("Header schema: {}", header.display());
    info!("Data directory: {}", data_dir.display());

    let builder = ReferenceIndexBuilder::new(header, data_dir);

    let files = builder.data_files()?;
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let index = builder.build_with_progress(|_| pb.inc(1))?;
    pb.finish_with_message("Build complete");

    info!(
        "Built index with {} records ({} rows skipped)",
        index.len(),
        index.skipped_rows()
    );

    IndexSnapshot::from_index(&index).write_to(&snapshot_path)?;

    Ok(())
}
