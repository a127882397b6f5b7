//! Runtime configuration: data file locations and log filter.

use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable naming the directory that holds the data files.
pub const DATA_DIR_ENV: &str = "CACTUSLOG_DATA_DIR";
/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CACTUSLOG_LOG";
/// Store document file name.
pub const DATA_FILE_NAME: &str = "cactus_data.json";
/// Species catalog file name.
pub const SPECIES_FILE_NAME: &str = "cactus_species.json";
/// Filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "cactuslog=info";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Store document path.
    pub data_file: PathBuf,
    /// Species catalog path.
    pub species_file: PathBuf,
    /// Log filter directive.
    pub log_filter: String,
}

impl AppConfig {
    /// Both data files placed in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join(DATA_FILE_NAME),
            species_file: dir.join(SPECIES_FILE_NAME),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Resolves the data directory from `cli_dir`, then [`DATA_DIR_ENV`], then the current directory.
    pub fn resolve(cli_dir: Option<&Path>) -> Self {
        Self::resolve_with(cli_dir, |key| env::var(key).ok())
    }

    /// Like [`AppConfig::resolve`] with an explicit variable lookup.
    pub fn resolve_with(cli_dir: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = cli_dir
            .map(Path::to_path_buf)
            .or_else(|| lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let mut cfg = Self::in_dir(dir);
        if let Some(filter) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.log_filter = filter;
        }
        cfg
    }
}
