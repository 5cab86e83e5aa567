//! Test fixture creation for data trees and warehouse databases

use serde_json::{json, Value};
use songplay_etl::etl::{run_pipeline, EtlError, PipelineReport};
use songplay_etl::warehouse::SqliteWarehouse;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding `song_data/`, `log_data/` and `warehouse.db`.
pub struct TestDataDir {
    // Held so the directory outlives the test
    _dir: TempDir,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub db_path: PathBuf,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let song_root = dir.path().join("song_data");
        let log_root = dir.path().join("log_data");
        let db_path = dir.path().join("warehouse.db");
        fs::create_dir_all(&song_root).expect("Failed to create song_data");
        fs::create_dir_all(&log_root).expect("Failed to create log_data");
        Self {
            _dir: dir,
            song_root,
            log_root,
            db_path,
        }
    }

    pub fn add_song_file(&self, relative: &str, contents: &str) -> PathBuf {
        write_file(&self.song_root, relative, contents)
    }

    /// Writes `events` as JSON Lines.
    pub fn add_log_file(&self, relative: &str, events: &[Value]) -> PathBuf {
        let lines: Vec<String> = events.iter().map(Value::to_string).collect();
        write_file(&self.log_root, relative, &lines.join("\n"))
    }

    pub fn open_warehouse(&self) -> SqliteWarehouse {
        SqliteWarehouse::open(&self.db_path).expect("Failed to open warehouse")
    }

    /// Runs the full pipeline against a freshly opened warehouse.
    pub fn run(&self) -> Result<PipelineReport, EtlError> {
        let mut warehouse = self.open_warehouse();
        run_pipeline(&mut warehouse, &self.song_root, &self.log_root)
    }
}

fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// A song metadata document with no artist location or coordinates.
pub fn song_json(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> String {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 2000
    })
    .to_string()
}

/// A `NextSong` event for a free user named Lily Koch.
pub fn next_song_event(ts: i64, user_id: i64, song: &str, artist: &str, length: f64) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Lily",
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Koch",
        "length": length,
        "level": "free",
        "location": "Chicago-Naperville-Elgin, IL-IN-WI",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1541048010796.0,
        "sessionId": 818,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": user_id.to_string()
    })
}

/// A non-play event with no song fields.
pub fn page_event(ts: i64, user_id: i64, page: &str) -> Value {
    json!({
        "artist": null,
        "auth": "Logged In",
        "firstName": "Lily",
        "gender": "F",
        "itemInSession": 1,
        "lastName": "Koch",
        "length": null,
        "level": "free",
        "location": "Chicago-Naperville-Elgin, IL-IN-WI",
        "method": "GET",
        "page": page,
        "registration": 1541048010796.0,
        "sessionId": 818,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": user_id.to_string()
    })
}
