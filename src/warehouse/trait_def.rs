//! WarehouseWriter trait definition.
//!
//! The record transformers only see this trait, so they can run against an
//! open unit of work on SQLite or against a recording double in tests.

use super::models::{ArtistRecord, SongMatch, SongPlayRecord, SongRecord, TimeRecord, UserRecord};
use anyhow::Result;

/// Write and lookup capability handed to the record transformers.
///
/// Every write applies its table's conflict policy, so callers never need to
/// check for an existing row first.
pub trait WarehouseWriter {
    // =========================================================================
    // Dimension Writes
    // =========================================================================

    /// Insert an artist, filling only NULL location/coordinates on conflict.
    fn upsert_artist(&self, artist: &ArtistRecord) -> Result<()>;

    /// Insert a song; a song id already present is left untouched.
    fn upsert_song(&self, song: &SongRecord) -> Result<()>;

    /// Insert a user, filling NULL attributes and updating the level on conflict.
    fn upsert_user(&self, user: &UserRecord) -> Result<()>;

    /// Insert a time mark; a start_time already present is left untouched.
    fn upsert_time(&self, time: &TimeRecord) -> Result<()>;

    // =========================================================================
    // Fact Writes
    // =========================================================================

    /// Insert a song play. Returns false when an identical play already exists.
    fn insert_songplay(&self, songplay: &SongPlayRecord) -> Result<bool>;

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Find the song matching title, artist name and duration exactly.
    fn find_song(&self, title: &str, artist_name: &str, duration: f64)
        -> Result<Option<SongMatch>>;
}
