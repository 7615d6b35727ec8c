use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    // Map-related errors
    #[error("Map file not found at path: {path}")]
    MapFileNotFound { path: PathBuf },

    #[error("Corrupted map file: {reason}")]
    CorruptedMapFile { reason: String },

    #[error("Invalid map data: {reason}")]
    InvalidMapData { reason: String },

    #[error("{reason}")]
    MapValidationFailed { reason: String },

    // CLI input
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// Result type alias for all fallible operations
pub type FlightResult<T> = Result<T, FlightError>;
