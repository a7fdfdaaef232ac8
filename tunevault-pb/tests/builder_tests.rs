//! End-to-end playlist build tests against a real store

use sqlx::{Row, SqlitePool};
use tempfile::TempDir;
use tunevault_common::db::init_database;
use tunevault_pb::{builder, BuildOptions};

async fn setup_store() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("catalog.db")).await.unwrap();
    (dir, pool)
}

async fn seed_genre(pool: &SqlitePool, name: &str) {
    sqlx::query("INSERT INTO genres (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

async fn seed_song(pool: &SqlitePool, id: &str, genre_tags: &str) {
    sqlx::query("INSERT INTO songs (id, title, genre_tags) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("Title of {}", id))
        .bind(genre_tags)
        .execute(pool)
        .await
        .unwrap();
}

async fn playlist_meta(pool: &SqlitePool, key: &str) -> Option<(String, i64)> {
    sqlx::query("SELECT name, num_songs FROM system_playlists WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .unwrap()
        .map(|row| (row.get("name"), row.get("num_songs")))
}

async fn members_of(pool: &SqlitePool, key: &str) -> Vec<(String, bool)> {
    sqlx::query(
        "SELECT song_id, is_last FROM system_playlist_songs \
         WHERE playlist_key = ? ORDER BY song_id",
    )
    .bind(key)
    .fetch_all(pool)
    .await
    .unwrap()
    .into_iter()
    .map(|row| (row.get("song_id"), row.get::<i64, _>("is_last") != 0))
    .collect()
}

#[tokio::test]
async fn test_full_build_classifies_and_marks_last() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    seed_genre(&pool, "pop").await;
    seed_song(&pool, "s1", r#"["Classic Rock"]"#).await;
    seed_song(&pool, "s2", r#"["pop", "rock"]"#).await;
    seed_song(&pool, "s3", "[]").await;

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.genres_processed(), 2);
    assert_eq!(report.written["rock"], 2);
    assert_eq!(report.written["pop"], 1);

    assert_eq!(playlist_meta(&pool, "rock").await, Some(("Rock".to_string(), 2)));
    assert_eq!(
        members_of(&pool, "rock").await,
        vec![("s1".to_string(), false), ("s2".to_string(), true)]
    );

    assert_eq!(playlist_meta(&pool, "pop").await, Some(("Pop".to_string(), 1)));
    assert_eq!(members_of(&pool, "pop").await, vec![("s2".to_string(), true)]);

    // s3 has no tags and appears in no playlist
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM system_playlist_songs WHERE song_id = 's3'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn test_compound_tag_joins_multiple_playlists() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "hiphop").await;
    seed_genre(&pool, "pop").await;
    seed_song(&pool, "s1", r#"["hiphop/urban", "pop"]"#).await;
    seed_song(&pool, "s2", r#"["pop"]"#).await;

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    assert!(report.is_success());
    // Independent is_last status per playlist
    assert_eq!(members_of(&pool, "hiphop").await, vec![("s1".to_string(), true)]);
    assert_eq!(
        members_of(&pool, "pop").await,
        vec![("s1".to_string(), false), ("s2".to_string(), true)]
    );
}

#[tokio::test]
async fn test_rerun_with_unchanged_catalog_is_idempotent() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    seed_song(&pool, "s1", r#"["rock"]"#).await;
    seed_song(&pool, "s2", r#"["hard rock"]"#).await;

    builder::run(&pool, &BuildOptions::default()).await.unwrap();
    let meta = playlist_meta(&pool, "rock").await;
    let members = members_of(&pool, "rock").await;

    builder::run(&pool, &BuildOptions::default()).await.unwrap();
    assert_eq!(playlist_meta(&pool, "rock").await, meta);
    assert_eq!(members_of(&pool, "rock").await, members);
}

#[tokio::test]
async fn test_empty_store_reports_all_zero() {
    let (_dir, pool) = setup_store().await;

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.genres_processed(), 0);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_playlists")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn test_unmatched_genre_leaves_prior_playlist_untouched() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "jazz").await;
    seed_song(&pool, "s1", r#"["rock"]"#).await;

    // A playlist from an earlier run, before the catalog changed
    sqlx::query("INSERT INTO system_playlists (key, name, num_songs) VALUES ('jazz', 'Jazz', 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO system_playlist_songs (playlist_key, song_id, is_last) VALUES ('jazz', 'old', 1)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    // Zero matches: jazz is not rewritten this run, and not deleted either
    assert!(report.is_success());
    assert_eq!(report.genres_processed(), 0);
    assert_eq!(playlist_meta(&pool, "jazz").await, Some(("Jazz".to_string(), 1)));
    assert_eq!(members_of(&pool, "jazz").await, vec![("old".to_string(), true)]);
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_any_write() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    sqlx::query("DROP TABLE songs").execute(&pool).await.unwrap();

    let result = builder::run(&pool, &BuildOptions::default()).await;

    assert!(matches!(result, Err(builder::BuildError::Fetch(_))));
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM system_playlists")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn test_one_failing_genre_does_not_abort_the_others() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    seed_genre(&pool, "pop").await;
    seed_song(&pool, "s1", r#"["rock"]"#).await;
    seed_song(&pool, "s2", r#"["pop"]"#).await;

    // Make every write for the pop playlist fail at the store
    sqlx::query(
        "CREATE TRIGGER fail_pop BEFORE INSERT ON system_playlists \
         WHEN NEW.key = 'pop' \
         BEGIN SELECT RAISE(ABORT, 'simulated store failure'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.genres_processed(), 2);
    assert_eq!(report.written["rock"], 1);
    assert!(matches!(
        report.failed["pop"],
        builder::BuildError::Persistence { .. }
    ));

    // The sibling write landed in full
    assert_eq!(members_of(&pool, "rock").await, vec![("s1".to_string(), true)]);
    assert_eq!(playlist_meta(&pool, "pop").await, None);
}

#[tokio::test]
async fn test_malformed_song_documents_do_not_crash_the_run() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    seed_song(&pool, "s1", r#"[42, null, "rock"]"#).await;
    seed_song(&pool, "s2", r#"{"not": "a list"}"#).await;
    seed_song(&pool, "s3", "not json at all").await;
    seed_song(&pool, "s4", r#""classic rock""#).await;

    let report = builder::run(&pool, &BuildOptions::default()).await.unwrap();

    assert!(report.is_success());
    // s1 via its one valid tag, s4 via the bare-string form
    assert_eq!(
        members_of(&pool, "rock").await,
        vec![("s1".to_string(), false), ("s4".to_string(), true)]
    );
}

#[tokio::test]
async fn test_prune_stale_members_follows_the_catalog() {
    let (_dir, pool) = setup_store().await;
    seed_genre(&pool, "rock").await;
    seed_song(&pool, "s1", r#"["rock"]"#).await;
    seed_song(&pool, "s2", r#"["rock"]"#).await;

    builder::run(&pool, &BuildOptions::default()).await.unwrap();
    assert_eq!(members_of(&pool, "rock").await.len(), 2);

    // s2 loses its rock tag; a pruning run drops its stale record
    sqlx::query("UPDATE songs SET genre_tags = '[\"pop\"]' WHERE id = 's2'")
        .execute(&pool)
        .await
        .unwrap();
    let options = BuildOptions {
        prune_stale_members: true,
        ..Default::default()
    };
    builder::run(&pool, &options).await.unwrap();

    assert_eq!(members_of(&pool, "rock").await, vec![("s1".to_string(), true)]);
    assert_eq!(playlist_meta(&pool, "rock").await, Some(("Rock".to_string(), 1)));
}
