//! In-memory grouping of songs into genre buckets

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Song;
use crate::matcher::{self, normalized_tags};

/// Build the per-genre song buckets for one run
///
/// Every genre in the vocabulary scans the full song sequence in catalog
/// order, so a multi-tagged song can land in any number of buckets. Genres
/// that match no songs get no entry at all: they produce no persisted
/// document, and a pre-existing one is left untouched.
pub fn build_buckets(
    vocabulary: &BTreeSet<String>,
    songs: &[Song],
) -> BTreeMap<String, Vec<String>> {
    // Normalize each song's tags once up front; match results are identical
    // to normalizing inside the scan
    let songs_with_tags: Vec<(&Song, Vec<String>)> = songs
        .iter()
        .map(|song| (song, normalized_tags(&song.genre_tags)))
        .collect();

    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for genre in vocabulary {
        for (song, tags) in &songs_with_tags {
            if matcher::matches(tags, genre) {
                buckets
                    .entry(genre.clone())
                    .or_default()
                    .push(song.id.clone());
            }
        }
    }

    buckets
}
