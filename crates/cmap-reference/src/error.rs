//! Error types for loading reference tables.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the reference or retirement tables.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Required column not found in the reference header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A retirement line does not carry both concept fields.
    #[error("malformed retirement line {line} in {path}: {message}")]
    RetiredLine {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

impl ReferenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReferenceError>;
