//! Missing-audio report
//!
//! Lists songs whose `audio_url` is absent or empty, identifying which
//! catalog entries still have no uploaded audio file linked to them.

use sqlx::{Row, SqlitePool};
use tunevault_common::Result;

/// A song with no linked audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAudioSong {
    pub id: String,
    pub title: String,
    pub spotify_url: Option<String>,
}

/// Find all songs missing an audio link, in catalog scan order
pub async fn find_missing_audio(pool: &SqlitePool) -> Result<Vec<MissingAudioSong>> {
    let rows = sqlx::query(
        "SELECT id, title, spotify_url FROM songs \
         WHERE audio_url IS NULL OR audio_url = '' \
         ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MissingAudioSong {
            id: row.get("id"),
            title: row.get("title"),
            spotify_url: row.get("spotify_url"),
        })
        .collect())
}
