use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::error::{DeleteError, LockError, OpenReadError, OpenWriteError};
use super::{
    Directory, DirectoryLock, Lock, ReadOnlySource, TerminatingWrite, WatchCallback,
    WatchEventRouter, WatchHandle, WritePtr,
};

#[derive(Default)]
struct InnerDirectory {
    fs: HashMap<PathBuf, Arc<Vec<u8>>>,
    open_for_write: std::collections::HashSet<PathBuf>,
}

/// An in-memory `Directory`, used by `Index::create_in_ram` and by every
/// unit test in this crate. Files are plain `Vec<u8>`s behind an
/// `Arc<RwLock<..>>` so clones of the directory see the same files.
#[derive(Clone, Default)]
pub struct RAMDirectory {
    fs: Arc<RwLock<InnerDirectory>>,
    watch_router: Arc<WatchEventRouter>,
}

impl RAMDirectory {
    pub fn create() -> RAMDirectory {
        RAMDirectory::default()
    }
}

impl fmt::Debug for RAMDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RAMDirectory")
    }
}

use std::fmt;

struct VecWriter {
    path: PathBuf,
    shared: Arc<RwLock<InnerDirectory>>,
    data: Vec<u8>,
    terminated: bool,
}

impl Drop for VecWriter {
    fn drop(&mut self) {
        if !self.terminated && !self.data.is_empty() {
            panic!(
                "{:?} was dropped without calling terminate()/flush() on its WritePtr",
                self.path
            );
        }
    }
}

impl Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut fs = self.shared.write().unwrap();
        fs.fs.insert(self.path.clone(), Arc::new(self.data.clone()));
        Ok(())
    }
}

impl TerminatingWrite for VecWriter {
    fn terminate(mut self: Box<Self>) -> io::Result<()> {
        self.flush()?;
        self.terminated = true;
        let mut fs = self.shared.write().unwrap();
        fs.open_for_write.remove(&self.path);
        Ok(())
    }
}

impl Directory for RAMDirectory {
    fn open_read(&self, path: &Path) -> Result<ReadOnlySource, OpenReadError> {
        self.fs
            .read()
            .unwrap()
            .fs
            .get(path)
            .map(|data| ReadOnlySource::from_shared(data.clone()))
            .ok_or_else(|| OpenReadError(path.to_path_buf()))
    }

    fn delete(&self, path: &Path) -> Result<(), DeleteError> {
        let mut fs = self.fs.write().unwrap();
        if fs.fs.remove(path).is_some() {
            Ok(())
        } else {
            Err(DeleteError::FileDoesNotExist(path.to_path_buf()))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.fs.read().unwrap().fs.contains_key(path)
    }

    fn open_write(&self, path: &Path) -> Result<WritePtr, OpenWriteError> {
        let mut fs = self.fs.write().unwrap();
        if fs.open_for_write.contains(path) {
            return Err(OpenWriteError::FileAlreadyExists(path.to_path_buf()));
        }
        fs.open_for_write.insert(path.to_path_buf());
        fs.fs.insert(path.to_path_buf(), Arc::new(Vec::new()));
        Ok(Box::new(VecWriter {
            path: path.to_path_buf(),
            shared: Arc::clone(&self.fs),
            data: Vec::new(),
            terminated: false,
        }))
    }

    fn atomic_read(&self, path: &Path) -> Result<Vec<u8>, OpenReadError> {
        self.fs
            .read()
            .unwrap()
            .fs
            .get(path)
            .map(|data| (**data).clone())
            .ok_or_else(|| OpenReadError(path.to_path_buf()))
    }

    fn atomic_write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut fs = self.fs.write().unwrap();
        fs.fs.insert(path.to_path_buf(), Arc::new(data.to_vec()));
        self.watch_router.broadcast();
        Ok(())
    }

    fn acquire_lock(&self, lock: &Lock) -> Result<DirectoryLock, LockError> {
        // A RAM directory never truly contends: one process, one set of
        // `Arc`s. We still track occupancy so a double-`IndexWriter` bug
        // surfaces as an error rather than silent corruption.
        let mut fs = self.fs.write().unwrap();
        let path = lock.filepath.clone();
        if fs.open_for_write.contains(&path) {
            return Err(LockError(
                path.display().to_string(),
                "lock file already held".to_string(),
            ));
        }
        fs.open_for_write.insert(path.clone());
        let shared = Arc::clone(&self.fs);
        Ok(DirectoryLock(Box::new(LockGuard { path, shared })))
    }

    fn watch(&self, watch_callback: WatchCallback) -> WatchHandle {
        self.watch_router.subscribe(watch_callback)
    }
}

struct LockGuard {
    path: PathBuf,
    shared: Arc<RwLock<InnerDirectory>>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.shared.write().unwrap().open_for_write.remove(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_directory_read_write() {
        let dir = RAMDirectory::create();
        let path = Path::new("foo");
        {
            let mut w = dir.open_write(path).unwrap();
            w.write_all(b"hello").unwrap();
            w.terminate().unwrap();
        }
        let source = dir.open_read(path).unwrap();
        assert_eq!(source.as_slice(), b"hello");
    }

    #[test]
    fn test_ram_directory_double_open_for_write_fails() {
        let dir = RAMDirectory::create();
        let path = Path::new("foo");
        let _w = dir.open_write(path).unwrap();
        assert!(dir.open_write(path).is_err());
    }

    #[test]
    fn test_atomic_write_read() {
        let dir = RAMDirectory::create();
        let path = Path::new("_toc");
        dir.atomic_write(path, b"toc-v1").unwrap();
        assert_eq!(dir.atomic_read(path).unwrap(), b"toc-v1");
        dir.atomic_write(path, b"toc-v2").unwrap();
        assert_eq!(dir.atomic_read(path).unwrap(), b"toc-v2");
    }

    #[test]
    fn test_lock_is_exclusive() {
        let dir = RAMDirectory::create();
        let lock = Lock::from_filename(super::super::INDEX_WRITER_LOCK, false);
        let guard = dir.acquire_lock(&lock).unwrap();
        assert!(dir.acquire_lock(&lock).is_err());
        drop(guard);
        assert!(dir.acquire_lock(&lock).is_ok());
    }
}
