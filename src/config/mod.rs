mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA_DIR: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_DIR: &str = "data/log_data";

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub reset_schema: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            song_data_dir: PathBuf::from(DEFAULT_SONG_DATA_DIR),
            log_data_dir: PathBuf::from(DEFAULT_LOG_DATA_DIR),
            reset_schema: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub reset_schema: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let song_data_dir = file
            .song_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data_dir.clone());
        let log_data_dir = file
            .log_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data_dir.clone());
        // Missing data directories load nothing, but a file in their place is a mistake
        for dir in [&song_data_dir, &log_data_dir] {
            if dir.exists() && !dir.is_dir() {
                bail!("Data path is not a directory: {:?}", dir);
            }
        }

        let reset_schema = file.reset_schema.unwrap_or(cli.reset_schema);

        Ok(Self {
            db_path,
            song_data_dir,
            log_data_dir,
            reset_schema,
        })
    }
}
