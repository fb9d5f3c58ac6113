use std::path::PathBuf;

use gog_types::{ObjectId, TypeError};
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No `.git` directory at (or above) the given path.
    #[error("not a git repository: {0}")]
    RepositoryNotFound(PathBuf),

    /// `init` target exists and is not a directory.
    #[error("work tree already exists as a file: {0}")]
    PathIsFile(PathBuf),

    /// `init` target is a directory with entries in it.
    #[error("work tree is not empty: {0}")]
    WorkTreeNotEmpty(PathBuf),

    /// A directory inside the git dir was expected but is missing.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The git dir exists but has no config file.
    #[error("config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    /// No loose object file for this address.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// A file path inside the git dir was requested with no segments.
    #[error("file path not provided")]
    EmptyPath,

    #[error("store error: {0}")]
    Store(#[from] gog_store::StoreError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
