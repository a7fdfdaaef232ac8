//! Configuration loading and database path resolution
//!
//! Every tool resolves its settings through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; an explicitly named one that
//! cannot be read or parsed is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the catalog database path
pub const DATABASE_ENV: &str = "TUNEVAULT_DATABASE";
/// Environment variable bounding concurrent per-genre playlist writes
pub const WRITE_CONCURRENCY_ENV: &str = "TUNEVAULT_WRITE_CONCURRENCY";
/// Environment variable enabling stale playlist member removal
pub const PRUNE_STALE_ENV: &str = "TUNEVAULT_PRUNE_STALE";

/// Default bound on concurrent per-genre playlist writes
pub const DEFAULT_WRITE_CONCURRENCY: usize = 4;

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub write_concurrency: Option<usize>,
    pub prune_stale_members: Option<bool>,
}

/// Command-line overrides fed into configuration resolution
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub write_concurrency: Option<usize>,
    pub prune_stale: Option<bool>,
}

/// Fully resolved tool configuration
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub database_path: PathBuf,
    pub write_concurrency: usize,
    pub prune_stale_members: bool,
}

/// Resolve the effective configuration for one tool invocation
pub fn resolve_config(cli: &CliOverrides) -> Result<ToolConfig> {
    let file = load_toml_config(cli.config_file.as_deref())?;

    let database_path = match &cli.database {
        Some(path) => path.clone(),
        None => match std::env::var(DATABASE_ENV) {
            Ok(value) => PathBuf::from(value),
            Err(_) => file
                .database_path
                .clone()
                .unwrap_or_else(default_database_path),
        },
    };

    let write_concurrency = match cli.write_concurrency {
        Some(limit) => limit,
        None => match env_usize(WRITE_CONCURRENCY_ENV)? {
            Some(limit) => limit,
            None => file.write_concurrency.unwrap_or(DEFAULT_WRITE_CONCURRENCY),
        },
    };
    if write_concurrency == 0 {
        return Err(Error::Config(
            "write_concurrency must be at least 1".to_string(),
        ));
    }

    let prune_stale_members = match cli.prune_stale {
        Some(flag) => flag,
        None => match env_bool(PRUNE_STALE_ENV)? {
            Some(flag) => flag,
            None => file.prune_stale_members.unwrap_or(false),
        },
    };

    Ok(ToolConfig {
        database_path,
        write_concurrency,
        prune_stale_members,
    })
}

/// Load the TOML config file
///
/// An explicit path must exist and parse. Without one, the platform default
/// location is tried and silently skipped when absent.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_file() {
            Some(path) if path.exists() => path,
            _ => return Ok(TomlConfig::default()),
        },
    };

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Default config file path for the platform
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunevault").join("config.toml"))
}

/// OS-dependent default catalog database path
pub fn default_database_path() -> PathBuf {
    let base = if cfg!(target_os = "macos") {
        dirs::data_dir()
    } else {
        dirs::data_local_dir()
    };

    base.map(|d| d.join("tunevault").join("catalog.db"))
        .unwrap_or_else(|| PathBuf::from("./tunevault/catalog.db"))
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|_| {
            Error::Config(format!("{} must be an integer, got '{}'", name, value))
        }),
        Err(_) => Ok(None),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(Error::Config(format!(
                "{} must be a boolean, got '{}'",
                name, other
            ))),
        },
        Err(_) => Ok(None),
    }
}
