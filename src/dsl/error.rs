//! Error types for loading program documents.

use std::path::PathBuf;

use thiserror::Error;

/// An error that occurred while loading a program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("cannot read program {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed program: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
