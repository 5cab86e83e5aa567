//! Parameterized statements used by the loaders.
//!
//! Each insert carries its table's conflict policy, so re-loading the same
//! file never duplicates or degrades a row.

// =============================================================================
// Dimension upserts
// =============================================================================

/// Existing location/coordinates win; incoming values only fill NULLs.
pub const ARTIST_UPSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(artist_id) DO UPDATE SET
        location = COALESCE(artists.location, excluded.location),
        latitude = COALESCE(artists.latitude, excluded.latitude),
        longitude = COALESCE(artists.longitude, excluded.longitude)";

pub const SONG_UPSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(song_id) DO NOTHING";

/// Names and gender fill NULLs only; the subscription level follows the latest event.
pub const USER_UPSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(user_id) DO UPDATE SET
        first_name = COALESCE(users.first_name, excluded.first_name),
        last_name = COALESCE(users.last_name, excluded.last_name),
        gender = COALESCE(users.gender, excluded.gender),
        level = COALESCE(excluded.level, users.level)";

pub const TIME_UPSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     ON CONFLICT(start_time) DO NOTHING";

// =============================================================================
// Fact insert
// =============================================================================

/// Skips a play already recorded with the same key. `IS` matches a NULL
/// session too, which the UNIQUE constraint treats as distinct.
pub const SONGPLAY_INSERT: &str = "INSERT INTO songplays
        (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
     SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
     WHERE NOT EXISTS (
        SELECT 1 FROM songplays
        WHERE start_time = ?1 AND user_id = ?2 AND song_id = ?4 AND artist_id = ?5
          AND session_id IS ?6
     )";

// =============================================================================
// Lookups
// =============================================================================

/// Resolves a play's (song_id, artist_id) from title, artist name and duration.
pub const SONG_LOOKUP: &str = "SELECT s.song_id, s.artist_id
     FROM songs s
     JOIN artists a ON a.artist_id = s.artist_id
     WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3
     LIMIT 1";
