//! tunevault-cm - Catalog maintenance tools
//!
//! One-shot glue operations over the TuneVault catalog store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunevault_cm::{main_genre, missing_audio};
use tunevault_common::config::{self, CliOverrides};

/// Command-line arguments for tunevault-cm
#[derive(Parser, Debug)]
#[command(name = "tunevault-cm")]
#[command(about = "Catalog maintenance tools for the TuneVault store")]
#[command(version)]
struct Args {
    /// Path to the catalog database
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Backfill the main_genre column from each song's first genre tag
    MainGenre,
    /// List songs that have no uploaded audio file linked to them
    MissingAudio,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunevault_cm=info,tunevault_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = config::resolve_config(&CliOverrides {
        database: args.database,
        config_file: args.config,
        ..Default::default()
    })
    .context("Failed to resolve configuration")?;

    info!("Database: {}", config.database_path.display());

    let pool = tunevault_common::db::init_database(&config.database_path)
        .await
        .context("Failed to open catalog database")?;

    match args.command {
        Command::MainGenre => {
            let report = main_genre::backfill_main_genre(&pool)
                .await
                .context("Main genre backfill failed")?;
            println!(
                "{} songs updated, {} skipped (no genre tags)",
                report.updated, report.skipped
            );
        }
        Command::MissingAudio => {
            let songs = missing_audio::find_missing_audio(&pool)
                .await
                .context("Missing audio scan failed")?;
            for song in &songs {
                println!(
                    "{}\n  {}",
                    song.title,
                    song.spotify_url.as_deref().unwrap_or("no URL")
                );
            }
            println!("{} songs with missing audio", songs.len());
        }
    }

    Ok(())
}
