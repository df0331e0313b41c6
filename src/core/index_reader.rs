use std::sync::{Arc, RwLock};

use crate::core::{Index, Searcher, SegmentReader};
use crate::directory::{WatchCallback, WatchHandle};
use crate::Result;

/// When a reader notices a new commit (§5 "Ordering guarantees": "Readers
/// opened before a commit continue to see the old TOC until they are
/// refreshed").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPolicy {
    /// Never reload automatically; the caller must call `reload()`.
    Manual,
    /// Reload as soon as the directory reports the meta file changed.
    OnCommit,
}

/// Builds an `IndexReader` with a chosen `ReloadPolicy`, mirroring the
/// teacher's builder-style `IndexReaderBuilder`.
pub struct IndexReaderBuilder {
    index: Index,
    reload_policy: ReloadPolicy,
}

impl IndexReaderBuilder {
    pub(crate) fn new(index: Index) -> IndexReaderBuilder {
        IndexReaderBuilder {
            index,
            reload_policy: ReloadPolicy::Manual,
        }
    }

    pub fn reload_policy(mut self, reload_policy: ReloadPolicy) -> IndexReaderBuilder {
        self.reload_policy = reload_policy;
        self
    }

    pub fn build(self) -> Result<IndexReader> {
        let searcher = load_searcher(&self.index)?;
        let inner = Arc::new(InnerIndexReader {
            index: self.index,
            searcher: RwLock::new(Arc::new(searcher)),
        });
        let watch_handle = match self.reload_policy {
            ReloadPolicy::Manual => None,
            ReloadPolicy::OnCommit => {
                let watched = Arc::clone(&inner);
                let callback: WatchCallback = Box::new(move || {
                    let _ = watched.reload();
                });
                Some(inner.index.directory().watch(callback))
            }
        };
        Ok(IndexReader { inner, watch_handle })
    }
}

fn load_searcher(index: &Index) -> Result<Searcher> {
    let meta = index.load_metas()?;
    let segment_readers = meta
        .segments
        .iter()
        .map(|segment_meta| SegmentReader::open(&index.segment(segment_meta.clone())))
        .collect::<Result<Vec<_>>>()?;
    Ok(Searcher::new(index.schema(), segment_readers))
}

struct InnerIndexReader {
    index: Index,
    searcher: RwLock<Arc<Searcher>>,
}

impl InnerIndexReader {
    fn reload(&self) -> Result<()> {
        let searcher = load_searcher(&self.index)?;
        *self.searcher.write()? = Arc::new(searcher);
        Ok(())
    }
}

/// A long-lived handle producing immutable `Searcher` snapshots. Readers
/// never observe a commit mid-flight: `searcher()` always returns one
/// fully-formed snapshot, and that snapshot stays valid until the next
/// `reload()` regardless of commits happening concurrently elsewhere.
#[derive(Clone)]
pub struct IndexReader {
    inner: Arc<InnerIndexReader>,
    watch_handle: Option<WatchHandle>,
}

impl IndexReader {
    /// Explicitly refreshes this reader's snapshot against the
    /// directory's current TOC.
    pub fn reload(&self) -> Result<()> {
        self.inner.reload()
    }

    /// A cheaply-cloneable, immutable snapshot of the index as of the
    /// last `reload` (or `build`, or the last auto-reload under
    /// `ReloadPolicy::OnCommit`).
    pub fn searcher(&self) -> Arc<Searcher> {
        Arc::clone(&self.inner.searcher.read().expect("searcher lock poisoned"))
    }
}

impl std::fmt::Debug for IndexReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IndexReader")
    }
}
