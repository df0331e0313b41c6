use std::io;
use std::path::PathBuf;

use failure::Fail;

/// Error returned when opening a file that does not exist in the directory.
#[derive(Debug, Fail)]
#[fail(display = "file does not exist: '{:?}'", _0)]
pub struct OpenReadError(pub PathBuf);

/// Error returned when a write is attempted against a path that is already
/// taken, or for which the parent does not support writes.
#[derive(Debug, Fail)]
pub enum OpenWriteError {
    #[fail(display = "the file '{:?}' already exists and cannot be overwritten", _0)]
    FileAlreadyExists(PathBuf),
    #[fail(display = "io error while opening '{:?}' for write: {}", _1, _0)]
    IoError(io::Error, PathBuf),
}

/// Error returned when deleting a file from a directory.
#[derive(Debug, Fail)]
pub enum DeleteError {
    #[fail(display = "file does not exist: '{:?}'", _0)]
    FileDoesNotExist(PathBuf),
    #[fail(display = "io error while deleting '{:?}': {}", _1, _0)]
    IoError(io::Error, PathBuf),
}

/// Error returned when a single-writer lock cannot be acquired.
#[derive(Debug, Fail)]
#[fail(display = "could not acquire lock '{}': {}", _0, _1)]
pub struct LockError(pub String, pub String);

impl From<io::Error> for OpenWriteError {
    fn from(err: io::Error) -> Self {
        OpenWriteError::IoError(err, PathBuf::new())
    }
}
