//! Build orchestration
//!
//! One run walks FetchGenres/FetchSongs (concurrent, both complete before
//! aggregation), Aggregate, then WriteAll. There is no intermediate
//! persistence and no rollback: a genre that fails to write is reported and
//! the remaining genres still run (partial-run semantics).

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use crate::{aggregate, catalog, writer};

/// Errors from the playlist build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    /// Vocabulary or catalog read failed; the run aborts before any write
    #[error("catalog fetch failed: {0}")]
    Fetch(#[source] tunevault_common::Error),

    /// One genre's playlist failed to persist; sibling genres are unaffected
    #[error("failed to persist playlist '{genre}': {source}")]
    Persistence {
        genre: String,
        #[source]
        source: tunevault_common::Error,
    },
}

/// Options for one build run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Bound on concurrent per-genre playlist writes
    pub write_concurrency: usize,
    /// Remove membership records for songs a playlist no longer matches
    pub prune_stale_members: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            write_concurrency: tunevault_common::config::DEFAULT_WRITE_CONCURRENCY,
            prune_stale_members: false,
        }
    }
}

/// Outcome of one build run
///
/// Both maps are keyed by genre name, so the report is deterministic
/// regardless of write completion order.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Genres written this run, with their member counts
    pub written: BTreeMap<String, usize>,
    /// Genres whose write failed
    pub failed: BTreeMap<String, BuildError>,
}

impl BuildReport {
    pub fn genres_processed(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run one full playlist build against the catalog
pub async fn run(pool: &SqlitePool, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    // The vocabulary and the catalog are independent reads
    let (vocabulary, songs) = tokio::try_join!(
        catalog::fetch_vocabulary(pool),
        catalog::fetch_songs(pool)
    )
    .map_err(BuildError::Fetch)?;
    info!(
        genres = vocabulary.len(),
        songs = songs.len(),
        "catalog fetched"
    );

    let buckets = aggregate::build_buckets(&vocabulary, &songs);

    // Per-genre writes share no state; run them through a bounded pool
    let results: Vec<(String, usize, Result<(), BuildError>)> = stream::iter(buckets)
        .map(|(genre, members)| async move {
            let count = members.len();
            let result = writer::write_playlist(pool, &genre, &members, options.prune_stale_members)
                .await
                .map_err(|source| BuildError::Persistence {
                    genre: genre.clone(),
                    source,
                });
            (genre, count, result)
        })
        .buffer_unordered(options.write_concurrency.max(1))
        .collect()
        .await;

    let mut report = BuildReport::default();
    for (genre, count, result) in results {
        match result {
            Ok(()) => {
                report.written.insert(genre, count);
            }
            Err(err) => {
                error!(genre = %genre, error = %err, "playlist write failed");
                report.failed.insert(genre, err);
            }
        }
    }

    info!(
        processed = report.genres_processed(),
        written = report.written.len(),
        failed = report.failed.len(),
        "playlist build finished"
    );
    Ok(report)
}
