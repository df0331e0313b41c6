use std::io;
use std::path::PathBuf;

use failure::Fail;

use crate::directory::error::{DeleteError, LockError, OpenReadError, OpenWriteError};
use crate::schema::DuplicateFieldName;

/// The crate's single top-level error type (§7 "Error handling design").
///
/// Every fallible public function returns `crate::Result<T> = Result<T,
/// TantivyError>`; lower layers (directory IO, JSON (de)serialization,
/// lock contention, schema construction) wrap into this enum via `From`
/// rather than being re-derived ad hoc at each call site.
#[derive(Debug, Fail)]
pub enum TantivyError {
    #[fail(display = "path does not exist: '{:?}'", _0)]
    PathDoesNotExist(PathBuf),
    #[fail(display = "file already exists: '{:?}'", _0)]
    FileAlreadyExists(PathBuf),
    #[fail(display = "an IO error occurred: '{}'", _0)]
    IoError(#[cause] io::Error),
    #[fail(display = "a thread holding the lock panicked and poisoned it")]
    Poisoned,
    #[fail(display = "failed to acquire directory lock: {:?}", _0)]
    LockFailure(LockError),
    #[fail(display = "could not open file for writing: {:?}", _0)]
    OpenWriteError(OpenWriteError),
    #[fail(display = "could not open file for reading: {:?}", _0)]
    OpenReadError(OpenReadError),
    #[fail(display = "failed to delete file: {:?}", _0)]
    DeleteError(DeleteError),
    #[fail(display = "index data is corrupted: '{}'", _0)]
    CorruptedFile(String),
    #[fail(display = "schema error: {}", _0)]
    SchemaError(String),
    #[fail(display = "invalid argument: {}", _0)]
    InvalidArgument(String),
    #[fail(display = "an error occurred in a background thread: '{}'", _0)]
    ErrorInThread(String),
    #[fail(display = "malformed query: {}", _0)]
    QueryError(String),
    #[fail(display = "term not found in the term dictionary")]
    TermNotFound,
    #[fail(display = "requested field has no stored term vector for this document")]
    NoVectorError,
    #[fail(display = "matcher does not support the requested access: {}", _0)]
    UnsupportedFeature(String),
    #[fail(display = "matcher operation attempted past exhaustion")]
    ReadTooFar,
    #[fail(display = "writer invoked out of required sort order: {}", _0)]
    OrderError(String),
    #[fail(display = "incompatible analyzer/filter pipeline: {}", _0)]
    CompositionError(String),
    #[fail(display = "cursor operation past end or before begin of the term dictionary")]
    InvalidCursor,
    #[fail(display = "quality inquiry unsupported on this matcher/scorer")]
    NoQualityAvailable,
    #[fail(display = "unknown segment codec: {}", _0)]
    UnknownCodec(String),
    #[fail(display = "operation was canceled")]
    Canceled,
}

impl From<io::Error> for TantivyError {
    fn from(err: io::Error) -> TantivyError {
        TantivyError::IoError(err)
    }
}

impl From<OpenReadError> for TantivyError {
    fn from(err: OpenReadError) -> TantivyError {
        TantivyError::OpenReadError(err)
    }
}

impl From<OpenWriteError> for TantivyError {
    fn from(err: OpenWriteError) -> TantivyError {
        TantivyError::OpenWriteError(err)
    }
}

impl From<DeleteError> for TantivyError {
    fn from(err: DeleteError) -> TantivyError {
        TantivyError::DeleteError(err)
    }
}

impl From<LockError> for TantivyError {
    fn from(err: LockError) -> TantivyError {
        TantivyError::LockFailure(err)
    }
}

impl From<serde_json::Error> for TantivyError {
    fn from(err: serde_json::Error) -> TantivyError {
        TantivyError::CorruptedFile(err.to_string())
    }
}

impl From<DuplicateFieldName> for TantivyError {
    fn from(err: DuplicateFieldName) -> TantivyError {
        TantivyError::SchemaError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TantivyError {
    fn from(_: std::sync::PoisonError<T>) -> TantivyError {
        TantivyError::Poisoned
    }
}
