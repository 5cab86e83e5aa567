//! Directory walking and per-file commits.

use super::{EtlError, LogFileTransformer, RecordTransformer, SongFileTransformer, TransformStats};
use crate::warehouse::SqliteWarehouse;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "json";

/// Outcome of loading one directory tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub root: PathBuf,
    pub files_found: usize,
    pub files_processed: usize,
    pub stats: TransformStats,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub songs: PassReport,
    pub logs: PassReport,
}

/// Proof that every song file was loaded and committed.
///
/// Song plays are resolved against the songs and artists tables, so the log
/// pass can only be started with this in hand.
#[derive(Debug)]
pub struct SongsLoaded {
    _private: (),
}

/// All `.json` files below `root`, recursively, sorted by name within each directory.
///
/// A missing root yields no files.
pub fn find_json_files(root: &Path) -> Result<Vec<PathBuf>, EtlError> {
    if !root.exists() {
        warn!("Data directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let is_source = entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION);
        if is_source {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load every source file under `root` with `transformer`, committing after each file.
///
/// The first failing file aborts the pass; its own writes are rolled back
/// while the files before it stay committed.
pub(crate) fn process_data<T: RecordTransformer>(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
    transformer: &T,
) -> Result<PassReport, EtlError> {
    let files = find_json_files(root)?;
    let total = files.len();
    debug!("Loading {} files", transformer.kind());
    info!("{} files found in {}", total, root.display());

    let mut report = PassReport {
        root: root.to_path_buf(),
        files_found: total,
        ..Default::default()
    };

    for (index, path) in files.iter().enumerate() {
        let contents = std::fs::read_to_string(path).map_err(|source| EtlError::Io {
            path: path.clone(),
            source,
        })?;

        let tx = warehouse.begin_load()?;
        let stats = transformer.transform(&tx, path, &contents)?;
        tx.commit()?;

        report.stats += stats;
        report.files_processed = index + 1;
        info!("{}/{} files processed.", index + 1, total);
    }

    info!("data process finished.");
    Ok(report)
}

pub fn load_song_files(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
) -> Result<(PassReport, SongsLoaded), EtlError> {
    let report = process_data(warehouse, root, &SongFileTransformer)?;
    Ok((report, SongsLoaded { _private: () }))
}

pub fn load_log_files(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
    _songs: &SongsLoaded,
) -> Result<PassReport, EtlError> {
    process_data(warehouse, root, &LogFileTransformer)
}

/// Song pass, then log pass.
pub fn run_pipeline(
    warehouse: &mut SqliteWarehouse,
    song_root: &Path,
    log_root: &Path,
) -> Result<PipelineReport, EtlError> {
    let (songs, songs_loaded) = load_song_files(warehouse, song_root)?;
    let logs = load_log_files(warehouse, log_root, &songs_loaded)?;
    Ok(PipelineReport { songs, logs })
}
