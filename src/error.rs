use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading or checking section content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },

    #[error("section {id}: {reason}")]
    InvalidSection { id: String, reason: String },

    #[error("section id {0} is used by more than one file")]
    DuplicateSection(String),

    #[error("no sections found in {0}")]
    Empty(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is set but empty")]
    Empty(&'static str),
}
