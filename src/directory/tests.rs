use std::io::Write;
use std::path::{Path, PathBuf};

use super::*;

fn test_simple(directory: &dyn Directory) {
    let test_path: &'static Path = Path::new("some_path_for_test");
    {
        let mut write_file = directory.open_write(test_path).unwrap();
        assert!(directory.exists(test_path));
        write_file.write_all(&[4]).unwrap();
        write_file.write_all(&[3]).unwrap();
        write_file.write_all(&[7, 3, 5]).unwrap();
        write_file.terminate().unwrap();
    }
    {
        let read_file = directory.open_read(test_path).unwrap();
        let data: &[u8] = &*read_file;
        assert_eq!(data, &[4u8, 3u8, 7u8, 3u8, 5u8]);
    }
    assert!(directory.delete(test_path).is_ok());
    assert!(!directory.exists(test_path));
}

fn test_rewrite_forbidden(directory: &dyn Directory) {
    let test_path: &'static Path = Path::new("some_path_for_rewrite_test");
    {
        let w = directory.open_write(test_path).unwrap();
        assert!(directory.exists(test_path));
        w.terminate().unwrap();
    }
    assert!(directory.open_write(test_path).is_err());
    assert!(directory.delete(test_path).is_ok());
}

fn test_write_create_the_file(directory: &dyn Directory) {
    let test_path: &'static Path = Path::new("some_path_created_by_write");
    assert!(directory.open_read(test_path).is_err());
    let w = directory.open_write(test_path).unwrap();
    assert!(directory.exists(test_path));
    w.terminate().unwrap();
    assert!(directory.open_read(test_path).is_ok());
    assert!(directory.delete(test_path).is_ok());
}

fn test_directory_delete(directory: &dyn Directory) {
    let test_path: &'static Path = Path::new("some_path_for_delete_test");
    assert!(directory.open_read(test_path).is_err());
    let mut write_file = directory.open_write(test_path).unwrap();
    write_file.write_all(&[1, 2, 3, 4]).unwrap();
    write_file.terminate().unwrap();
    {
        let read_handle = directory.open_read(test_path).unwrap();
        assert_eq!(&*read_handle, &[1u8, 2u8, 3u8, 4u8]);
    }
    assert!(directory.delete(test_path).is_ok());
    assert!(directory.delete(Path::new("some_path_that_never_existed")).is_err());
    assert!(directory.open_read(test_path).is_err());
    assert!(directory.delete(test_path).is_err());
}

fn test_atomic_swap(directory: &dyn Directory) {
    let path = Path::new("_toc");
    directory.atomic_write(path, b"first").unwrap();
    assert_eq!(directory.atomic_read(path).unwrap(), b"first");
    directory.atomic_write(path, b"second").unwrap();
    assert_eq!(directory.atomic_read(path).unwrap(), b"second");
}

fn test_lock_non_blocking(directory: &dyn Directory) {
    let lock_a = Lock {
        filepath: PathBuf::from("a.lock"),
        is_blocking: false,
    };
    let lock_b = Lock {
        filepath: PathBuf::from("b.lock"),
        is_blocking: false,
    };
    {
        let guard_a = directory.acquire_lock(&lock_a).unwrap();
        assert!(directory.acquire_lock(&lock_b).is_ok());
        assert!(directory.acquire_lock(&lock_a).is_err());
        drop(guard_a);
    }
    assert!(directory.acquire_lock(&lock_a).is_ok());
}

fn test_directory(directory: &dyn Directory) {
    test_simple(directory);
    test_rewrite_forbidden(directory);
    test_write_create_the_file(directory);
    test_directory_delete(directory);
    test_atomic_swap(directory);
    test_lock_non_blocking(directory);
}

#[test]
fn test_ram_directory() {
    let ram_directory = RAMDirectory::create();
    test_directory(&ram_directory);
}

#[test]
#[should_panic]
fn ram_directory_panics_if_terminate_forgotten() {
    let test_path: &'static Path = Path::new("some_path_for_test");
    let ram_directory = RAMDirectory::create();
    let mut write_file = ram_directory.open_write(test_path).unwrap();
    write_file.write_all(&[4]).unwrap();
    // `write_file` is dropped here without calling `.terminate()`: the RAM
    // directory's writer treats that as a programming error, not a silent
    // no-op, so that forgetting to finalize a segment file is caught early.
}

#[cfg(feature = "mmap")]
#[test]
fn test_mmap_directory() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let mmap_directory = MmapDirectory::open(tmp_dir.path()).unwrap();
    test_directory(&mmap_directory);
}

#[test]
fn test_watch_callback_invoked_on_atomic_write() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let directory = RAMDirectory::create();
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = Arc::clone(&counter);
    let _watch_handle = directory.watch(Box::new(move || {
        counter_clone.fetch_add(1, Ordering::SeqCst);
    }));
    directory.atomic_write(Path::new("meta.json"), b"v1").unwrap();
    directory.atomic_write(Path::new("meta.json"), b"v2").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}
