use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LineRunnerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Outer region size {outer} must exceed the exclusion radius {exclusion}")]
    OuterRegionTooSmall { outer: f32, exclusion: f32 },

    #[error("Failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LineRunnerError>;
