//! Deterministic persistence of one genre bucket
//!
//! A playlist rewrite is metadata first, then one membership upsert per
//! member. The store does not guarantee ordered retrieval of membership
//! records, so ordering is carried solely by the `is_last` marker on the
//! terminal member.

use sqlx::SqlitePool;
use tracing::debug;
use tunevault_common::Result;

use crate::catalog;

/// Store key for a playlist document: normalized genre with whitespace
/// runs replaced
pub fn playlist_key(genre: &str) -> String {
    genre
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Human-facing playlist title: genre with its first letter upper-cased
pub fn display_name(genre: &str) -> String {
    let mut chars = genre.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Persist one genre bucket
///
/// The metadata row is always written, member count included, even for an
/// empty bucket. Each member record carries `is_last` for the member at the
/// final position of this run's ordering; deterministic keys make a re-run
/// with unchanged members rewrite identical rows.
///
/// Membership records from earlier runs that this run no longer produces
/// are left in place unless `prune_stale` is set.
pub async fn write_playlist(
    pool: &SqlitePool,
    genre: &str,
    members: &[String],
    prune_stale: bool,
) -> Result<()> {
    let key = playlist_key(genre);

    catalog::upsert_playlist(pool, &key, &display_name(genre), members.len() as i64).await?;

    let last = members.len().saturating_sub(1);
    for (position, song_id) in members.iter().enumerate() {
        catalog::upsert_playlist_member(pool, &key, song_id, position == last).await?;
    }

    if prune_stale {
        catalog::delete_stale_members(pool, &key, members).await?;
    }

    debug!(genre, members = members.len(), "playlist written");
    Ok(())
}
