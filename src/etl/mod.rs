//! File-to-warehouse loading.
//!
//! Two record transformers turn one decoded source file into warehouse writes,
//! and the driver walks a directory tree feeding every `.json` file to one of
//! them, committing after each file.

mod driver;
mod error;
mod log_file;
mod song_file;
mod time_mark;

pub use driver::{
    find_json_files, load_log_files, load_song_files, run_pipeline, PassReport, PipelineReport,
    SongsLoaded,
};
pub use error::EtlError;
pub use log_file::{LogEvent, LogFileTransformer, NEXT_SONG_PAGE};
pub use song_file::{SongFile, SongFileTransformer};
pub use time_mark::derive_time_mark;

use crate::warehouse::WarehouseWriter;
use std::ops::AddAssign;
use std::path::Path;

/// Turns the contents of one source file into warehouse writes.
pub trait RecordTransformer {
    /// Kind of file handled, used in progress logs.
    fn kind(&self) -> &'static str;

    /// Decode `contents` (read from `path`) and write its rows through `writer`.
    ///
    /// An error means the file could not be loaded as a whole; the caller
    /// discards the file's pending writes.
    fn transform(
        &self,
        writer: &dyn WarehouseWriter,
        path: &Path,
        contents: &str,
    ) -> Result<TransformStats, EtlError>;
}

/// What a transformer wrote for one or more files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub artists: usize,
    pub songs: usize,
    pub time_marks: usize,
    pub users_written: usize,
    pub user_failures: usize,
    pub songplays: usize,
    pub lookup_misses: usize,
    /// Matched plays dropped because the event carried no usable user id.
    pub plays_without_user: usize,
    /// Events dropped by the page filter.
    pub events_skipped: usize,
}

impl AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.artists += other.artists;
        self.songs += other.songs;
        self.time_marks += other.time_marks;
        self.users_written += other.users_written;
        self.user_failures += other.user_failures;
        self.songplays += other.songplays;
        self.lookup_misses += other.lookup_misses;
        self.plays_without_user += other.plays_without_user;
        self.events_skipped += other.events_skipped;
    }
}
