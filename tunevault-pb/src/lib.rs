//! tunevault-pb library interface
//!
//! Re-derives the curated system genre playlists from the full song catalog:
//! fetch the genre vocabulary and the catalog, classify each song into zero
//! or more genre buckets by fuzzy tag matching, and rewrite each bucket as
//! an ordered playlist with a terminal-element marker.

pub mod aggregate;
pub mod builder;
pub mod catalog;
pub mod matcher;
pub mod writer;

pub use builder::{run, BuildError, BuildOptions, BuildReport};
