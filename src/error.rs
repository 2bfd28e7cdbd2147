use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the usage engine. Any of these aborts the invocation.
///
/// Per-entry I/O failures during traversal never show up here; they only
/// shrink the totals.
#[derive(Error, Debug)]
pub enum DuError {
    /// The root path is neither an existing file nor an existing directory.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A path discovered during parallel recursion was neither a file nor a
    /// directory by the time it was visited.
    #[error("not a valid path: {}", .0.display())]
    NotAValidPath(PathBuf),

    /// A scan task panicked or was cancelled.
    #[error("scan task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("I/O semaphore closed")]
    SemaphoreClosed(#[from] tokio::sync::AcquireError),
}

pub type Result<T> = std::result::Result<T, DuError>;
