use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not determine the mime type of {}", .0.display())]
    Unresolved(PathBuf),

    #[error("No application found for mime type '{0}'")]
    NoEntryFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

