//! Songplay ETL Library
//!
//! Loads song metadata and listening event logs from JSON files into a
//! SQLite star schema. The binary wires these modules together; they are
//! exposed here for testing and reuse.

pub mod config;
pub mod etl;
pub mod sqlite_persistence;
pub mod warehouse;

pub use etl::{run_pipeline, EtlError, PipelineReport};
pub use warehouse::SqliteWarehouse;
