//! # TuneVault Common Library
//!
//! Shared code for the TuneVault catalog maintenance tools including:
//! - Error types
//! - Configuration resolution
//! - Database pool and schema initialization
//! - Catalog document decoding helpers

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
