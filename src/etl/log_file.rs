//! Event log files: one JSON event per line, recording every interaction a
//! user had with the app.
//!
//! Only `NextSong` events are plays. Each play yields a time mark and a user
//! row; it becomes a song play fact only when its song can be resolved
//! against the already loaded songs and artists.

use super::time_mark::derive_time_mark;
use super::{EtlError, RecordTransformer, TransformStats};
use crate::warehouse::{SongMatch, SongPlayRecord, UserRecord, WarehouseWriter};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::{debug, error, warn};

/// Page value identifying a song play.
pub const NEXT_SONG_PAGE: &str = "NextSong";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub page: String,
    pub ts: i64,
    /// Raw user id: logged-out events carry an empty string. Numbers are kept
    /// in their integer form when they have no fraction.
    #[serde(default, deserialize_with = "deserialize_user_id")]
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Float(f64),
    Text(String),
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawUserId>::deserialize(deserializer)? {
        Some(RawUserId::Number(n)) => Some(n.to_string()),
        // 7.0 is user 7; 7.5 stays as text and fails only that event's user write
        Some(RawUserId::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Some((f as i64).to_string())
        }
        Some(RawUserId::Float(f)) => Some(f.to_string()),
        Some(RawUserId::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

impl LogEvent {
    pub fn is_song_play(&self) -> bool {
        self.page == NEXT_SONG_PAGE
    }

    /// Numeric user id, failing when the event has none or it is not a number.
    pub fn user_key(&self) -> anyhow::Result<i64> {
        let raw = self
            .user_id
            .as_deref()
            .ok_or_else(|| anyhow!("event at {} has no userId", self.ts))?;
        raw.parse()
            .with_context(|| format!("event at {} has non-numeric userId {:?}", self.ts, raw))
    }

    pub fn user(&self) -> anyhow::Result<UserRecord> {
        Ok(UserRecord {
            user_id: self.user_key()?,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        })
    }
}

/// Decode a log file as JSON Lines, or as a JSON array when it starts with `[`.
fn decode_events(path: &Path, contents: &str) -> Result<Vec<LogEvent>, EtlError> {
    if contents.trim_start().starts_with('[') {
        return serde_json::from_str(contents).map_err(|source| EtlError::Decode {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        });
    }

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| EtlError::Decode {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

fn write_user(writer: &dyn WarehouseWriter, event: &LogEvent) -> anyhow::Result<()> {
    writer.upsert_user(&event.user()?)
}

fn resolve_song(
    writer: &dyn WarehouseWriter,
    event: &LogEvent,
) -> anyhow::Result<Option<SongMatch>> {
    match (&event.song, &event.artist, event.length) {
        (Some(song), Some(artist), Some(length)) => writer.find_song(song, artist, length),
        _ => Ok(None),
    }
}

/// Writes time marks, users and resolved song plays for every `NextSong` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFileTransformer;

impl RecordTransformer for LogFileTransformer {
    fn kind(&self) -> &'static str {
        "log"
    }

    fn transform(
        &self,
        writer: &dyn WarehouseWriter,
        path: &Path,
        contents: &str,
    ) -> Result<TransformStats, EtlError> {
        let events = decode_events(path, contents)?;
        let plays: Vec<&LogEvent> = events.iter().filter(|e| e.is_song_play()).collect();
        let mut stats = TransformStats {
            events_skipped: events.len() - plays.len(),
            ..Default::default()
        };

        for event in &plays {
            writer.upsert_time(&derive_time_mark(event.ts)?)?;
            stats.time_marks += 1;
        }

        // A bad user row is reported and skipped, the rest of the file still loads
        for event in &plays {
            match write_user(writer, event) {
                Ok(()) => stats.users_written += 1,
                Err(e) => {
                    error!(
                        "Failed to write user for event at {} in {:?}: {:#}",
                        event.ts, path, e
                    );
                    stats.user_failures += 1;
                }
            }
        }

        for event in &plays {
            let Some(found) = resolve_song(writer, event)? else {
                debug!(
                    "No song matches {:?} by {:?} ({:?}s)",
                    event.song, event.artist, event.length
                );
                stats.lookup_misses += 1;
                continue;
            };

            let user_id = match event.user_key() {
                Ok(user_id) => user_id,
                Err(e) => {
                    warn!("Skipping song play in {:?}: {:#}", path, e);
                    stats.plays_without_user += 1;
                    continue;
                }
            };

            let songplay = SongPlayRecord {
                start_time: event.ts,
                user_id,
                level: event.level.clone(),
                song_id: found.song_id,
                artist_id: found.artist_id,
                session_id: event.session_id,
                location: event.location.clone(),
                user_agent: event.user_agent.clone(),
            };
            if writer.insert_songplay(&songplay)? {
                stats.songplays += 1;
            }
        }

        Ok(stats)
    }
}
