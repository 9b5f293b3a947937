//! Error types for list and configuration ingestion.

use std::path::PathBuf;

use thiserror::Error;

use listmatch_model::{ErrorKind, MatchError};

/// Errors that can occur while reading lists or configuration.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Content Errors ===
    /// The input held no usable value in its first column.
    #[error("no items found in the first column")]
    NoItems,

    /// The delimited text could not be parsed.
    #[error("failed to parse delimited text at line {line}: {message}")]
    Csv { line: u64, message: String },

    // === File System Errors ===
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// The configuration document is malformed.
    #[error("failed to parse configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ConfigParseError,
    },
}

/// Why a configuration document was rejected.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// The document parsed but its match defaults are unusable.
    #[error(transparent)]
    Defaults(#[from] MatchError),
}

impl IngestError {
    /// Every ingestion failure belongs to the ingestion category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Ingestion
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        Self::Csv {
            line,
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::ConfigParse {
            path: PathBuf::from("/path/to/config.json"),
            source: ConfigParseError::Defaults(MatchError::InvalidThreshold {
                threshold: "inf".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse configuration /path/to/config.json: threshold inf is not a finite number"
        );
        assert_eq!(err.kind(), ErrorKind::Ingestion);
    }

    #[test]
    fn test_no_items_is_ingestion() {
        assert_eq!(IngestError::NoItems.kind(), ErrorKind::Ingestion);
    }
}
