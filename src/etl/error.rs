use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a load pass.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path:?} at line {line}: {source}")]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Timestamp {0} is outside the representable range")]
    InvalidTimestamp(i64),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}
