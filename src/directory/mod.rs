//! Byte-storage abstraction required by the core (§6 "Storage"): list,
//! create, open, mmap, delete and lock files by name, plus a scratch
//! directory for temporaries. Two implementations ship with the crate: an
//! in-memory `RAMDirectory` (used by tests and by `Index::create_in_ram`)
//! and an `MmapDirectory` over a real filesystem path, gated behind the
//! `mmap` cargo feature the way the teacher gates it.

mod directory_lock;
mod error;
mod mmap_directory;
mod ram_directory;
mod read_only_source;
mod watch_event_router;

#[cfg(test)]
mod tests;

use std::fmt::Debug;
use std::io::{self, Write};
use std::path::Path;

pub use self::directory_lock::{DirectoryLock, Lock, INDEX_WRITER_LOCK, META_LOCK};
pub use self::error::{DeleteError, LockError, OpenReadError, OpenWriteError};
#[cfg(feature = "mmap")]
pub use self::mmap_directory::MmapDirectory;
pub use self::ram_directory::RAMDirectory;
pub use self::read_only_source::ReadOnlySource;
pub use self::watch_event_router::{WatchCallback, WatchHandle};

/// A write handle that must be explicitly finalized (flushed and, where
/// meaningful, fsynced) via `terminate` rather than relying on `Drop` --
/// forgetting to call it is a programming error the RAM implementation
/// panics on, matching the teacher's `TerminatingWrite` contract.
pub trait TerminatingWrite: Write {
    fn terminate(self: Box<Self>) -> io::Result<()>;
}

pub type WritePtr = Box<dyn TerminatingWrite + 'static>;

/// Byte-storage abstraction. Implementors must be safe to share across
/// threads: reads are always against immutable, already-written files.
pub trait Directory: DirectoryClone + fmt::Debug + Send + Sync + 'static {
    /// Opens a read-only view over an existing file.
    fn open_read(&self, path: &Path) -> Result<ReadOnlySource, OpenReadError>;

    /// Removes a file. Segment files are only ever deleted once no live
    /// reader can reference them (tracked by the merge scheduler's
    /// reference counting, see §10).
    fn delete(&self, path: &Path) -> Result<(), DeleteError>;

    /// Returns whether a file of this name currently exists.
    fn exists(&self, path: &Path) -> bool;

    /// Opens a file for exclusive, append-style writing. Fails if the file
    /// already exists -- segment files are immutable once finalized (§3).
    fn open_write(&self, path: &Path) -> Result<WritePtr, OpenWriteError>;

    /// Reads a whole small file into memory (used for the TOC and the lock
    /// bookkeeping, never for segment data).
    fn atomic_read(&self, path: &Path) -> Result<Vec<u8>, OpenReadError>;

    /// Writes a whole file atomically: either the old contents or the new
    /// contents are ever observable, never a partial write. This is the
    /// single linearization point used for TOC replacement (§5).
    fn atomic_write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Acquires an advisory lock, blocking or failing immediately depending
    /// on `lock.is_blocking`.
    fn acquire_lock(&self, lock: &Lock) -> Result<DirectoryLock, LockError>;

    /// Registers a callback invoked when the named "meta" file changes,
    /// backing `IndexReader::reload()`'s optional auto-reload mode. The
    /// in-memory directory treats this as a no-op (`WatchHandle` with an
    /// empty guard) since there is nothing external to watch.
    fn watch(&self, watch_callback: WatchCallback) -> WatchHandle;
}

use std::fmt;

/// `Directory` trait objects need to be cloned (an `IndexWriter` and every
/// `IndexReader` each hold their own handle); this is the standard
/// clone-behind-a-trait-object pattern the teacher also uses for its
/// `Directory: DirectoryClone` supertrait.
pub trait DirectoryClone {
    fn box_clone(&self) -> Box<dyn Directory>;
}

impl<T> DirectoryClone for T
where
    T: 'static + Directory + Clone,
{
    fn box_clone(&self) -> Box<dyn Directory> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Directory> {
    fn clone(&self) -> Box<dyn Directory> {
        self.box_clone()
    }
}
