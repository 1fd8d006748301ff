//! Error types for loading and manipulating scenes
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn OBJ text into a scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("input contains no vertex records")]
    EmptyScene,

    #[error("line {line}: vertex reference {index} is out of range")]
    InvalidReference { line: usize, index: i64 },

    #[error("line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("no scene is loaded")]
    NoScene,

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}
