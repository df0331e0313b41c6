use std::path::Path;

/// A name for a lock file plus how long to wait (in milliseconds) for a
/// contended lock before giving up. `INDEX_WRITER_LOCK` is taken for the
/// whole lifetime of an `IndexWriter`; `META_LOCK` is taken only while the
/// TOC is being swapped.
#[derive(Debug, Clone)]
pub struct Lock {
    pub filepath: std::path::PathBuf,
    pub is_blocking: bool,
}

pub const INDEX_WRITER_LOCK: &str = ".vellum-writer.lock";
pub const META_LOCK: &str = ".vellum-meta.lock";

impl Lock {
    pub fn from_filename(filename: &str, is_blocking: bool) -> Lock {
        Lock {
            filepath: Path::new(filename).to_path_buf(),
            is_blocking,
        }
    }
}

/// RAII guard returned by `Directory::acquire_lock`; the lock is released
/// when this is dropped, via the ordinary `Drop` impl of whatever concrete
/// guard type the directory implementation boxes up (an `fs2` file lock
/// for `MmapDirectory`, a bookkeeping entry removal for `RAMDirectory`).
pub struct DirectoryLock(pub(crate) Box<dyn Send + Sync + 'static>);
