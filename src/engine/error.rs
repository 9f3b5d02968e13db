//! Hard failures of the execution engine.
//!
//! Catalog misses and analysis failures are reported to the output and do
//! not appear here; these variants abort the command that raised them.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("invalid identifier '{0}' (expected bpm, song name, artist or key)")]
    InvalidIdentifier(String),

    #[error("audio file for song '{song}' does not exist: {}", path.display())]
    MissingAudioFile { song: String, path: PathBuf },

    #[error("output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Output(e.to_string())
    }
}
