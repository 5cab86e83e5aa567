//! Row types written to the warehouse tables.

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Calendar breakdown of a play timestamp, keyed by the raw epoch millis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRecord {
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongPlayRecord {
    pub start_time: i64,
    pub user_id: i64,
    pub level: Option<String>,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Keys of a song matched by title, artist name and duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Row counts of every warehouse table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songplays: usize,
    pub users: usize,
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
}
