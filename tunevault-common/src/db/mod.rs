//! Shared SQLite catalog access
//!
//! All maintenance tools open the same catalog database. Initialization is
//! idempotent: tables are created on first use and re-running is safe.

pub mod models;

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer, which the playlist
    // builder relies on during parallel per-genre writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Writers back off instead of failing immediately on a locked database
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the catalog tables (idempotent - safe to call multiple times)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_songs_table(pool).await?;
    create_genres_table(pool).await?;
    create_system_playlists_table(pool).await?;
    create_system_playlist_songs_table(pool).await?;

    Ok(())
}

/// Song documents. `genre_tags` holds the raw document field as JSON: an
/// array of tags, a bare string, or malformed content that consumers must
/// tolerate. `main_genre`, `audio_url` and `spotify_url` are written by
/// external collaborators and other maintenance tools.
async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            genre_tags TEXT NOT NULL DEFAULT '[]',
            main_genre TEXT,
            audio_url TEXT,
            spotify_url TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Genre vocabulary, one row per registered genre name
async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            name TEXT PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Curated playlist documents, one row per genre that accumulated members
async fn create_system_playlists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS system_playlists (
            key TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            num_songs INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Playlist membership records carrying the terminal-element marker
async fn create_system_playlist_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS system_playlist_songs (
            playlist_key TEXT NOT NULL,
            song_id TEXT NOT NULL,
            is_last INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (playlist_key, song_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
