use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type returned by every fallible filesystem operation.
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors produced by filesystem implementations.
///
/// The type is `Clone` and `PartialEq` so that a literal error can be
/// registered as a mock return value and compared in assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("file already closed")]
    Closed,

    #[error("EOF")]
    Eof,

    #[error("invalid argument: {0}")]
    InvalidInput(String),

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("{message}")]
    Io { kind: io::ErrorKind, message: String },

    #[error("{0}")]
    Other(String),
}

impl FsError {
    /// Free-form error, the equivalent of a plain message error.
    pub fn other(message: impl Into<String>) -> Self {
        FsError::Other(message.into())
    }

    /// Classifies an I/O error that happened while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => err.into(),
        }
    }

    /// The closest `io::ErrorKind` for this error.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            FsError::PermissionDenied(_) => io::ErrorKind::PermissionDenied,
            FsError::Eof => io::ErrorKind::UnexpectedEof,
            FsError::InvalidInput(_) => io::ErrorKind::InvalidInput,
            FsError::Unsupported(_) => io::ErrorKind::Unsupported,
            FsError::Io { kind, .. } => *kind,
            FsError::Closed | FsError::Other(_) => io::ErrorKind::Other,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => FsError::Eof,
            kind => FsError::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        io::Error::new(err.kind(), err)
    }
}
