//! Shared constants for end-to-end tests

// ============================================================================
// Song Metadata
// ============================================================================

pub const ARTIST_1_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_1_NAME: &str = "Line Renaud";

pub const SONG_1_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_1_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_1_DURATION: f64 = 152.92036;

pub const ARTIST_2_ID: &str = "AR8IEZO1187B99055E";
pub const ARTIST_2_NAME: &str = "Marc Shaiman";

pub const SONG_2_ID: &str = "SOINLJW12A8C13314C";
pub const SONG_2_TITLE: &str = "City Slickers";
pub const SONG_2_DURATION: f64 = 149.86404;

// ============================================================================
// Listening Events
// ============================================================================

/// 2018-11-02 01:25:34.796 UTC, a Friday.
pub const PLAY_TS_1: i64 = 1541121934796;

/// 2018-12-01 00:02:59.796 UTC, a Saturday.
pub const PLAY_TS_2: i64 = 1543622579796;

pub const USER_ID: i64 = 42;
