//! Common test infrastructure
//!
//! Builds throwaway song and log data trees plus a warehouse database in a
//! temporary directory. Tests should only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{song_json, TestDataDir};
//!
//! #[test]
//! fn test_load() {
//!     let data = TestDataDir::new();
//!     data.add_song_file("A/A/A/TRAAAAA.json", &song_json("S1", "T", "A1", "X", 180.0));
//!     let report = data.run().unwrap();
//!     assert_eq!(report.songs.files_processed, 1);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::*;
