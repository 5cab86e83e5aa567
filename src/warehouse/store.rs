//! SQLite-backed warehouse store.
//!
//! A single connection serves the whole load; every file is written inside
//! its own `LoadTransaction` which the driver commits once the file is done.

use super::models::*;
use super::queries;
use super::schema::{latest_schema, WAREHOUSE_VERSIONED_SCHEMAS};
use super::trait_def::WarehouseWriter;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use tracing::{debug, info};

pub struct SqliteWarehouse {
    conn: Connection,
}

fn check_schema(conn: &Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let latest_version = WAREHOUSE_VERSIONED_SCHEMAS.len() - 1;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating warehouse schema at version {}", latest_version);
        latest_schema().create(conn)?;
        return Ok(());
    }

    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {} and was not created by this loader; use --reset-schema or a fresh database path",
            db_version
        );
    }
    let current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version != latest_version {
        bail!(
            "Database schema version {} does not match the supported version {}",
            current_version,
            latest_version
        );
    }

    latest_schema()
        .validate(conn)
        .context("Warehouse schema validation failed")
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse database at `db_path`.
    ///
    /// A brand new database gets the latest schema; an existing one must carry
    /// the same schema version and is validated against the declared tables.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open warehouse database {:?}", db_path))?;
        Self::from_connection(conn)
    }

    /// Open the database at `db_path` after dropping every warehouse table,
    /// so the load starts from an empty schema.
    pub fn recreate<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open warehouse database {:?}", db_path))?;
        latest_schema().drop(&conn)?;
        info!("Dropped warehouse tables in {:?}", db_path);
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        check_schema(&conn)?;
        let warehouse = Self { conn };
        let counts = warehouse.get_counts()?;
        info!(
            "Opened warehouse: {} songplays, {} users, {} songs, {} artists, {} time marks",
            counts.songplays, counts.users, counts.songs, counts.artists, counts.time
        );
        Ok(warehouse)
    }

    /// Start the unit of work for one source file.
    pub fn begin_load(&mut self) -> Result<LoadTransaction<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(LoadTransaction { tx })
    }

    pub fn get_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                    r.get(0)
                })?;
            Ok(n as usize)
        };
        Ok(TableCounts {
            songplays: count("songplays")?,
            users: count("users")?,
            songs: count("songs")?,
            artists: count("artists")?,
            time: count("time")?,
        })
    }

    pub fn get_artist(&self, artist_id: &str) -> Result<Option<ArtistRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT artist_id, name, location, latitude, longitude FROM artists WHERE artist_id = ?1",
                params![artist_id],
                |r| {
                    Ok(ArtistRecord {
                        artist_id: r.get(0)?,
                        name: r.get(1)?,
                        location: r.get(2)?,
                        latitude: r.get(3)?,
                        longitude: r.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn get_song(&self, song_id: &str) -> Result<Option<SongRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT song_id, title, artist_id, year, duration FROM songs WHERE song_id = ?1",
                params![song_id],
                |r| {
                    Ok(SongRecord {
                        song_id: r.get(0)?,
                        title: r.get(1)?,
                        artist_id: r.get(2)?,
                        year: r.get(3)?,
                        duration: r.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT user_id, first_name, last_name, gender, level FROM users WHERE user_id = ?1",
                params![user_id],
                |r| {
                    Ok(UserRecord {
                        user_id: r.get(0)?,
                        first_name: r.get(1)?,
                        last_name: r.get(2)?,
                        gender: r.get(3)?,
                        level: r.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn get_time(&self, start_time: i64) -> Result<Option<TimeRecord>> {
        Ok(self
            .conn
            .query_row(
                "SELECT start_time, hour, day, week, month, year, weekday FROM time WHERE start_time = ?1",
                params![start_time],
                |r| {
                    Ok(TimeRecord {
                        start_time: r.get(0)?,
                        hour: r.get(1)?,
                        day: r.get(2)?,
                        week: r.get(3)?,
                        month: r.get(4)?,
                        year: r.get(5)?,
                        weekday: r.get(6)?,
                    })
                },
            )
            .optional()?)
    }

    /// All song plays ordered by start time, then insertion order.
    pub fn list_songplays(&self) -> Result<Vec<SongPlayRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
             FROM songplays ORDER BY start_time, songplay_id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(SongPlayRecord {
                    start_time: r.get(0)?,
                    user_id: r.get(1)?,
                    level: r.get(2)?,
                    song_id: r.get(3)?,
                    artist_id: r.get(4)?,
                    session_id: r.get(5)?,
                    location: r.get(6)?,
                    user_agent: r.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

/// Writes of one source file; dropped without `commit` they are rolled back.
pub struct LoadTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl LoadTransaction<'_> {
    pub fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit load transaction")
    }
}

impl WarehouseWriter for LoadTransaction<'_> {
    fn upsert_artist(&self, artist: &ArtistRecord) -> Result<()> {
        self.tx.prepare_cached(queries::ARTIST_UPSERT)?.execute(params![
            &artist.artist_id,
            &artist.name,
            &artist.location,
            artist.latitude,
            artist.longitude,
        ])?;
        Ok(())
    }

    fn upsert_song(&self, song: &SongRecord) -> Result<()> {
        self.tx.prepare_cached(queries::SONG_UPSERT)?.execute(params![
            &song.song_id,
            &song.title,
            &song.artist_id,
            song.year,
            song.duration,
        ])?;
        Ok(())
    }

    fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        self.tx.prepare_cached(queries::USER_UPSERT)?.execute(params![
            user.user_id,
            &user.first_name,
            &user.last_name,
            &user.gender,
            &user.level,
        ])?;
        Ok(())
    }

    fn upsert_time(&self, time: &TimeRecord) -> Result<()> {
        self.tx.prepare_cached(queries::TIME_UPSERT)?.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week,
            time.month,
            time.year,
            time.weekday,
        ])?;
        Ok(())
    }

    fn insert_songplay(&self, songplay: &SongPlayRecord) -> Result<bool> {
        let inserted = self
            .tx
            .prepare_cached(queries::SONGPLAY_INSERT)?
            .execute(params![
                songplay.start_time,
                songplay.user_id,
                &songplay.level,
                &songplay.song_id,
                &songplay.artist_id,
                songplay.session_id,
                &songplay.location,
                &songplay.user_agent,
            ])?;
        if inserted == 0 {
            debug!(
                "Song play at {} for user {} already recorded",
                songplay.start_time, songplay.user_id
            );
        }
        Ok(inserted > 0)
    }

    fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<SongMatch>> {
        let found = self
            .tx
            .prepare_cached(queries::SONG_LOOKUP)?
            .query_row(params![title, artist_name, duration], |r| {
                Ok(SongMatch {
                    song_id: r.get(0)?,
                    artist_id: r.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }
}
