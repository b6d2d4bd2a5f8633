//! @ai:module:intent Define error types for the goshape extractor
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for every fatal goshape failure
///
/// Unresolved type expressions are not errors; they resolve to the sentinel descriptor.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Parse error at {file}:{line}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Malformed struct tag {tag}: {message}")]
    MalformedTag { tag: String, message: String },

    #[error("No output path given and {inputs} inputs provided; pass -o")]
    MissingOutput { inputs: usize },

    #[error("Failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
