use crate::parser::ScanError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToggleError {
    #[error("{}: {error}", path.display())]
    Scan { path: PathBuf, error: ScanError },
    #[error("cannot select tags and exclude tags at the same time")]
    FilterConflict,
    #[error("'all' cannot be excluded")]
    ExcludeAll,
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: no comment marker known for this file type", .0.display())]
    UnsupportedFile(PathBuf),
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl ToggleError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToggleError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
