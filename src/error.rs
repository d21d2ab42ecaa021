use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the edges of the review app: loading the file feed
/// and reading/writing settings. The grid engine itself never fails; it
/// reports absence through `Option`/`bool` instead.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file feed {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings file: {0}")]
    SettingsRead(#[from] toml::de::Error),

    #[error("could not serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error("unsupported source {0}: expected a .json export or a folder")]
    UnsupportedSource(PathBuf),

    #[error("background task failed: {0}")]
    Task(String),
}

impl ReviewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReviewError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
