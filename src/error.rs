use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnimacyError>;

/// Fatal failures. Per-record problems are skipped and counted instead.
#[derive(Error, Debug)]
pub enum AnimacyError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to read zip archive {path:?}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("zip archive {0:?} has no files")]
    EmptyArchive(PathBuf),
    #[error("failed to parse config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path:?} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnimacyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnimacyError::Io {
            path: path.into(),
            source,
        }
    }
}
