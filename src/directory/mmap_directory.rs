use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use atomicwrites::{AtomicFile, OverwriteBehavior};
use fs2::FileExt;
use memmap::Mmap;

use super::error::{DeleteError, LockError, OpenReadError, OpenWriteError};
use super::{
    Directory, DirectoryLock, Lock, ReadOnlySource, TerminatingWrite, WatchCallback,
    WatchEventRouter, WatchHandle,
};
use crate::directory::WritePtr;

/// A `Directory` backed by a real filesystem path. Segment files are
/// opened with `mmap` for zero-copy reads; the TOC is swapped with
/// `atomicwrites` so a crash mid-write never leaves a half-written
/// manifest visible to a reader; locks use `fs2` advisory file locks so
/// that the single-writer discipline (§5) holds across processes, not
/// just within one.
#[derive(Clone)]
pub struct MmapDirectory {
    root: PathBuf,
    mmap_cache: Arc<RwLock<HashMap<PathBuf, Arc<Mmap>>>>,
    watch_router: Arc<WatchEventRouter>,
}

impl std::fmt::Debug for MmapDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MmapDirectory({:?})", self.root)
    }
}

impl MmapDirectory {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<MmapDirectory> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(MmapDirectory {
            root,
            mmap_cache: Arc::new(RwLock::new(HashMap::new())),
            watch_router: Arc::new(WatchEventRouter::new()),
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

struct SafeFileWriter {
    file: File,
    path: PathBuf,
    terminated: bool,
}

impl Write for SafeFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl TerminatingWrite for SafeFileWriter {
    fn terminate(mut self: Box<Self>) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        self.terminated = true;
        Ok(())
    }
}

impl Drop for SafeFileWriter {
    fn drop(&mut self) {
        if !self.terminated {
            log::warn!("{:?} dropped without terminate(); data may not be durable", self.path);
        }
    }
}

impl Directory for MmapDirectory {
    fn open_read(&self, path: &Path) -> Result<ReadOnlySource, OpenReadError> {
        let full_path = self.resolve(path);
        if let Some(cached) = self.mmap_cache.read().unwrap().get(&full_path) {
            return Ok(ReadOnlySource::from_shared(Arc::new(MmapGuard(Arc::clone(cached)))));
        }
        let file = File::open(&full_path).map_err(|_| OpenReadError(path.to_path_buf()))?;
        let metadata = file.metadata().map_err(|_| OpenReadError(path.to_path_buf()))?;
        if metadata.len() == 0 {
            return Ok(ReadOnlySource::empty());
        }
        let mmap = unsafe { Mmap::map(&file) }.map_err(|_| OpenReadError(path.to_path_buf()))?;
        let mmap = Arc::new(mmap);
        self.mmap_cache
            .write()
            .unwrap()
            .insert(full_path, Arc::clone(&mmap));
        Ok(ReadOnlySource::from_shared(Arc::new(MmapGuard(mmap))))
    }

    fn delete(&self, path: &Path) -> Result<(), DeleteError> {
        let full_path = self.resolve(path);
        self.mmap_cache.write().unwrap().remove(&full_path);
        fs::remove_file(&full_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                DeleteError::FileDoesNotExist(path.to_path_buf())
            } else {
                DeleteError::IoError(e, path.to_path_buf())
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn open_write(&self, path: &Path) -> Result<WritePtr, OpenWriteError> {
        let full_path = self.resolve(path);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    OpenWriteError::FileAlreadyExists(path.to_path_buf())
                } else {
                    OpenWriteError::IoError(e, path.to_path_buf())
                }
            })?;
        Ok(Box::new(SafeFileWriter {
            file,
            path: path.to_path_buf(),
            terminated: false,
        }))
    }

    fn atomic_read(&self, path: &Path) -> Result<Vec<u8>, OpenReadError> {
        fs::read(self.resolve(path)).map_err(|_| OpenReadError(path.to_path_buf()))
    }

    fn atomic_write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let full_path = self.resolve(path);
        let atomic_file = AtomicFile::new(&full_path, OverwriteBehavior::AllowOverwrite);
        atomic_file.write(|f| f.write_all(data))?;
        self.watch_router.broadcast();
        Ok(())
    }

    fn acquire_lock(&self, lock: &Lock) -> Result<DirectoryLock, LockError> {
        let full_path = self.resolve(&lock.filepath);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&full_path)
            .map_err(|e| LockError(full_path.display().to_string(), e.to_string()))?;
        if lock.is_blocking {
            file.lock_exclusive()
                .map_err(|e| LockError(full_path.display().to_string(), e.to_string()))?;
        } else {
            file.try_lock_exclusive()
                .map_err(|e| LockError(full_path.display().to_string(), e.to_string()))?;
        }
        Ok(DirectoryLock(Box::new(file)))
    }

    fn watch(&self, watch_callback: WatchCallback) -> WatchHandle {
        self.watch_router.subscribe(watch_callback)
    }
}

/// Adapter so a cached `Arc<Mmap>` can back a `ReadOnlySource`.
struct MmapGuard(Arc<Mmap>);

impl std::ops::Deref for MmapGuard {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0[..]
    }
}
unsafe impl Send for MmapGuard {}
unsafe impl Sync for MmapGuard {}
