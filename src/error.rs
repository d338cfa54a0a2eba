use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cocotab operations.
#[derive(Debug, Error)]
pub enum CocotabError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Aspect ratio undefined for {context}: dimensions {width}x{height} contain a zero")]
    DegenerateDimensions {
        context: String,
        width: i64,
        height: i64,
    },

    #[error("Arithmetic overflow computing area for {context}")]
    ArithmeticOverflow { context: String },

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),
}

impl CocotabError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CocotabError::Io {
            path: path.into(),
            source,
        }
    }
}
