//! Main-genre backfill
//!
//! Copies the first genre tag of each song into the dedicated `main_genre`
//! column, giving consumers the primary genre without decoding the full tag
//! list. Songs with no usable tag are skipped, not cleared.

use sqlx::{Row, SqlitePool};
use tracing::debug;
use tunevault_common::db::models::parse_genre_tags;
use tunevault_common::Result;

/// Outcome of one backfill pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub updated: usize,
    pub skipped: usize,
}

/// Set `main_genre` from the first string tag of every song's tag list
pub async fn backfill_main_genre(pool: &SqlitePool) -> Result<BackfillReport> {
    let rows = sqlx::query("SELECT id, genre_tags FROM songs ORDER BY rowid")
        .fetch_all(pool)
        .await?;

    let mut report = BackfillReport::default();
    for row in rows {
        let id: String = row.get("id");
        let raw: String = row.get("genre_tags");

        match first_string_tag(&raw) {
            Some(main_genre) => {
                sqlx::query(
                    "UPDATE songs SET main_genre = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                )
                .bind(&main_genre)
                .bind(&id)
                .execute(pool)
                .await?;
                debug!(song = %id, main_genre = %main_genre, "main genre set");
                report.updated += 1;
            }
            None => {
                debug!(song = %id, "no genre tags, skipped");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// First string tag of the stored genre field
///
/// Malformed (non-string) entries are passed over the same way the playlist
/// builder ignores them when matching.
fn first_string_tag(raw: &str) -> Option<String> {
    parse_genre_tags(raw)
        .iter()
        .find_map(|tag| tag.as_str().map(|s| s.to_string()))
}
