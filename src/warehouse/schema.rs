//! SQLite schema definitions for the listening-activity star schema.
//!
//! One fact table (`songplays`) surrounded by four dimension tables
//! (`users`, `songs`, `artists`, `time`).

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

// =============================================================================
// Fact Table
// =============================================================================

/// One row per resolved song play.
const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Integer, non_null = true), // epoch millis
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[("idx_songplays_user", "user_id")],
    unique_constraints: &[&["start_time", "user_id", "song_id", "artist_id", "session_id"]],
};

// =============================================================================
// Dimension Tables
// =============================================================================

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text), // 'free' or 'paid'
    ],
    indices: &[],
    unique_constraints: &[],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer), // 0 when unknown
        sqlite_column!("duration", &SqlType::Real), // seconds
    ],
    indices: &[("idx_songs_title", "title")],
    unique_constraints: &[],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
    unique_constraints: &[],
};

/// Calendar breakdown of each distinct play timestamp (UTC).
const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("hour", &SqlType::Integer),
        sqlite_column!("day", &SqlType::Integer),
        sqlite_column!("week", &SqlType::Integer), // ISO-8601 week number
        sqlite_column!("month", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("weekday", &SqlType::Integer), // Monday = 0
    ],
    indices: &[],
    unique_constraints: &[],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const WAREHOUSE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGPLAYS_TABLE,
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
    ],
}];

/// Every table name of the latest schema, in declaration order.
pub fn table_names() -> Vec<&'static str> {
    latest_schema().tables.iter().map(|t| t.name).collect()
}

pub fn latest_schema() -> &'static VersionedSchema {
    &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1]
}
