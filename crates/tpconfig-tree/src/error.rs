//! Errors reading configuration input.

use std::path::PathBuf;

/// The configuration could not be read. No partial document is produced.
#[derive(Debug)]
pub enum LoadError {
    Io {
        /// The file being read, if the input came from a path.
        path: Option<PathBuf>,
        error: std::io::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io {
                path: Some(path),
                error,
            } => write!(f, "failed to read {}: {}", path.display(), error),
            LoadError::Io { path: None, error } => write!(f, "failed to read input: {}", error),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { error, .. } => Some(error),
        }
    }
}
