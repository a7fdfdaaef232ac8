//! tunevault-pb - System playlist builder
//!
//! One-shot maintenance tool: re-derives the curated genre playlists from
//! the full song catalog and rewrites them in the store. Exits 0 only when
//! every genre persisted; a partial failure still applies the writes that
//! succeeded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunevault_common::config::{self, CliOverrides};
use tunevault_pb::{builder, BuildOptions};

/// Command-line arguments for tunevault-pb
#[derive(Parser, Debug)]
#[command(name = "tunevault-pb")]
#[command(about = "System playlist builder for the TuneVault catalog")]
#[command(version)]
struct Args {
    /// Path to the catalog database
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum concurrent per-genre playlist writes
    #[arg(long)]
    write_concurrency: Option<usize>,

    /// Remove membership records for songs a playlist no longer matches
    #[arg(long)]
    prune_stale: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunevault_pb=info,tunevault_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = config::resolve_config(&CliOverrides {
        database: args.database,
        config_file: args.config,
        write_concurrency: args.write_concurrency,
        prune_stale: args.prune_stale.then_some(true),
    })
    .context("Failed to resolve configuration")?;

    info!("Database: {}", config.database_path.display());

    let pool = tunevault_common::db::init_database(&config.database_path)
        .await
        .context("Failed to open catalog database")?;

    let options = BuildOptions {
        write_concurrency: config.write_concurrency,
        prune_stale_members: config.prune_stale_members,
    };
    let report = builder::run(&pool, &options)
        .await
        .context("Playlist build aborted")?;

    for (genre, count) in &report.written {
        println!("Playlist '{}' - {} songs", genre, count);
    }
    for (genre, err) in &report.failed {
        println!("Playlist '{}' - FAILED: {}", genre, err);
    }
    println!(
        "{} playlists processed: {} written, {} failed",
        report.genres_processed(),
        report.written.len(),
        report.failed.len()
    );

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
