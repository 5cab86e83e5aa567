//! Song metadata files: one flat JSON object per file describing a song
//! and its artist.

use super::{EtlError, RecordTransformer, TransformStats};
use crate::warehouse::{ArtistRecord, SongRecord, WarehouseWriter};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Decoded song metadata file.
///
/// The artist location and coordinates must be present but may be null.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SongFile {
    pub artist_id: String,
    pub artist_name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub artist_location: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub artist_latitude: Option<f64>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub artist_longitude: Option<f64>,
    pub song_id: String,
    pub title: String,
    pub year: i32,
    pub duration: f64,
}

impl SongFile {
    pub fn artist(&self) -> ArtistRecord {
        ArtistRecord {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            // Blank locations are stored as NULL so a later file can fill them in
            location: self
                .artist_location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }

    pub fn song(&self) -> SongRecord {
        SongRecord {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }
}

/// Writes exactly one artist and one song per file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SongFileTransformer;

impl RecordTransformer for SongFileTransformer {
    fn kind(&self) -> &'static str {
        "song"
    }

    fn transform(
        &self,
        writer: &dyn WarehouseWriter,
        path: &Path,
        contents: &str,
    ) -> Result<TransformStats, EtlError> {
        let song_file: SongFile =
            serde_json::from_str(contents).map_err(|source| EtlError::Decode {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })?;

        writer.upsert_artist(&song_file.artist())?;
        writer.upsert_song(&song_file.song())?;
        debug!("Loaded song {} by {}", song_file.song_id, song_file.artist_id);

        Ok(TransformStats {
            artists: 1,
            songs: 1,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::SqliteWarehouse;

    const SONG_JSON: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

    #[test]
    fn test_parses_song_file() {
        let song_file: SongFile = serde_json::from_str(SONG_JSON).unwrap();
        assert_eq!(song_file.artist_id, "ARD7TVE1187B99BFB1");
        assert_eq!(song_file.artist_latitude, None);
        assert_eq!(song_file.year, 0);
        assert_eq!(song_file.duration, 218.93179);

        let artist = song_file.artist();
        assert_eq!(artist.name, "Casual");
        assert_eq!(artist.location.as_deref(), Some("California - LA"));

        let song = song_file.song();
        assert_eq!(song.title, "I Didn't Mean To");
        assert_eq!(song.artist_id, "ARD7TVE1187B99BFB1");
    }

    #[test]
    fn test_blank_location_becomes_null() {
        let json = SONG_JSON.replace("California - LA", "  ");
        let song_file: SongFile = serde_json::from_str(&json).unwrap();
        assert_eq!(song_file.artist().location, None);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = r#"{"artist_id": "A1", "artist_name": "X", "artist_location": null, "artist_latitude": null, "artist_longitude": null, "song_id": "S1", "year": 2000, "duration": 180.0}"#;
        assert!(serde_json::from_str::<SongFile>(json).is_err());
    }

    #[test]
    fn test_nullable_artist_fields_must_be_present() {
        let json = r#"{"artist_id": "A1", "artist_name": "X", "song_id": "S1", "title": "T", "year": 2000, "duration": 180.0}"#;
        assert!(serde_json::from_str::<SongFile>(json).is_err());
    }

    #[test]
    fn test_transform_writes_artist_and_song() {
        let mut warehouse = SqliteWarehouse::open_in_memory().unwrap();
        let tx = warehouse.begin_load().unwrap();
        let stats = SongFileTransformer
            .transform(&tx, Path::new("song.json"), SONG_JSON)
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(stats.artists, 1);
        assert_eq!(stats.songs, 1);
        assert!(warehouse.get_artist("ARD7TVE1187B99BFB1").unwrap().is_some());
        assert!(warehouse.get_song("SOMZWCG12A8C13C480").unwrap().is_some());
    }

    #[test]
    fn test_transform_reports_decode_error_with_path() {
        let mut warehouse = SqliteWarehouse::open_in_memory().unwrap();
        let tx = warehouse.begin_load().unwrap();
        let err = SongFileTransformer
            .transform(&tx, Path::new("broken.json"), "{\"artist_id\": ")
            .unwrap_err();
        match err {
            EtlError::Decode { path, .. } => assert_eq!(path, Path::new("broken.json")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
