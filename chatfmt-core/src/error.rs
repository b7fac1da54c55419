use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatfmtError {
    #[error("invalid output format: {0}")]
    InvalidFormat(String),

    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("input file is not valid UTF-8: {path}")]
    NonUtf8Input { path: PathBuf },

    #[error("invalid json in {path} at line {line} column {column}: {source}")]
    InvalidJson {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("'messages' key not found or empty in {path}")]
    MissingMessages { path: PathBuf },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChatfmtError>;
