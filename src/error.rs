use std::path::PathBuf;

use thiserror::Error;

/// Failures of the score file. None of these ever reach the simulation;
/// the session logs them and keeps playing on in-memory state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score file I/O failed at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("score file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode scores: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config value {field} = {value} is out of range")]
    Invalid { field: &'static str, value: f32 },
}
