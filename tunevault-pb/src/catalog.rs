//! Catalog store access for the playlist builder
//!
//! Read side: the genre vocabulary and the full song catalog. Write side:
//! playlist documents and their membership records, addressed by
//! deterministic keys (playlist key, song id) so rewrites upsert in place.

use std::collections::BTreeSet;

use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tunevault_common::db::models::parse_genre_tags;
use tunevault_common::Result;

use crate::matcher::normalize_genre;

/// Song document as read from the catalog
#[derive(Debug, Clone)]
pub struct Song {
    pub id: String,
    pub genre_tags: Vec<Value>,
}

/// Fetch the set of distinct normalized genre names
///
/// Rows whose name is empty after normalization are skipped, matching how
/// the store treats unnamed genre documents.
pub async fn fetch_vocabulary(pool: &SqlitePool) -> Result<BTreeSet<String>> {
    let rows = sqlx::query("SELECT name FROM genres")
        .fetch_all(pool)
        .await?;

    let mut vocabulary = BTreeSet::new();
    for row in rows {
        let name: String = row.get("name");
        let normalized = normalize_genre(&name);
        if !normalized.is_empty() {
            vocabulary.insert(normalized);
        }
    }

    Ok(vocabulary)
}

/// Fetch all songs in catalog scan order (store insertion order)
pub async fn fetch_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query("SELECT id, genre_tags FROM songs ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let raw: String = row.get("genre_tags");
            Song {
                id: row.get("id"),
                genre_tags: parse_genre_tags(&raw),
            }
        })
        .collect())
}

/// Upsert a playlist document's metadata
pub async fn upsert_playlist(
    pool: &SqlitePool,
    key: &str,
    name: &str,
    num_songs: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO system_playlists (key, name, num_songs, updated_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET
            name = excluded.name,
            num_songs = excluded.num_songs,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(name)
    .bind(num_songs)
    .execute(pool)
    .await?;

    Ok(())
}

/// Upsert one playlist membership record
pub async fn upsert_playlist_member(
    pool: &SqlitePool,
    key: &str,
    song_id: &str,
    is_last: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO system_playlist_songs (playlist_key, song_id, is_last)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_key, song_id) DO UPDATE SET
            is_last = excluded.is_last
        "#,
    )
    .bind(key)
    .bind(song_id)
    .bind(is_last)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete membership records of a playlist whose song is not in `keep`
pub async fn delete_stale_members(
    pool: &SqlitePool,
    key: &str,
    keep: &[String],
) -> Result<()> {
    if keep.is_empty() {
        sqlx::query("DELETE FROM system_playlist_songs WHERE playlist_key = ?")
            .bind(key)
            .execute(pool)
            .await?;
        return Ok(());
    }

    let placeholders = vec!["?"; keep.len()].join(", ");
    let sql = format!(
        "DELETE FROM system_playlist_songs WHERE playlist_key = ? AND song_id NOT IN ({})",
        placeholders
    );
    let mut query = sqlx::query(&sql).bind(key);
    for song_id in keep {
        query = query.bind(song_id);
    }
    query.execute(pool).await?;

    Ok(())
}
