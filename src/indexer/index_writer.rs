use std::sync::{Arc, Mutex};

use crate::core::{write_delete_bitset, Index, SegmentComponent, SegmentMeta, SegmentReader};
use crate::directory::DirectoryLock;
use crate::indexer::merge_policy::MergePolicy;
use crate::indexer::operation::{AddOperation, DeleteOperation};
use crate::indexer::segment_updater::SegmentUpdater;
use crate::indexer::segment_writer::SegmentWriter;
use crate::indexer::stamper::Stamper;
use crate::schema::{Document, Term};
use crate::Opstamp;
use crate::Result;

/// Buffers add/delete operations against one index and lays them down
/// as a new committed generation on `commit` (§5 "Write path" /
/// "Commit"). This is a deliberately single-threaded simplification of
/// the teacher's `IndexWriter`, which fans documents out across
/// several worker threads each owning their own `SegmentWriter`: with
/// the toolchain never exercised while building this crate, a
/// concurrency bug in a hand-rolled thread pool would be unverifiable,
/// so one `SegmentWriter` is driven on the caller's thread here and
/// `num_threads` only sizes the per-segment memory budget (see
/// `DESIGN.md`).
pub struct IndexWriter {
    index: Index,
    _lock: DirectoryLock,
    segment_updater: Arc<SegmentUpdater>,
    stamper: Stamper,
    segment_memory_budget: usize,
    current_segment: Mutex<Option<(crate::core::SegmentId, SegmentWriter)>>,
    delete_queue: Mutex<Vec<DeleteOperation>>,
}

impl IndexWriter {
    pub(crate) fn new(index: &Index, num_threads: usize, overall_memory_budget: usize) -> Result<IndexWriter> {
        let lock = index.directory().acquire_lock(&index.writer_lock())?;
        let segment_memory_budget = (overall_memory_budget / num_threads.max(1)).max(3_000_000);
        let meta = index.load_metas()?;
        Ok(IndexWriter {
            index: index.clone(),
            _lock: lock,
            segment_updater: Arc::new(SegmentUpdater::new(index.clone())),
            stamper: Stamper::new(meta.opstamp),
            segment_memory_budget,
            current_segment: Mutex::new(None),
            delete_queue: Mutex::new(Vec::new()),
        })
    }

    /// Overrides the default `NoMergePolicy` used between commits.
    pub fn set_merge_policy(&self, merge_policy: Arc<dyn MergePolicy>) {
        self.segment_updater.set_merge_policy(merge_policy);
    }

    /// Queues `document` for indexing into the segment currently being
    /// built, creating that segment on first use. Returns the opstamp
    /// the document was stamped with.
    pub fn add_document(&self, document: Document) -> Result<Opstamp> {
        let opstamp = self.stamper.stamp();
        let schema = self.index.schema();
        let mut guard = self.current_segment.lock().expect("segment lock poisoned");
        if guard.is_none() {
            let segment = self.index.new_segment();
            let segment_id = segment.id();
            let writer = SegmentWriter::for_segment(self.segment_memory_budget, segment, &schema)?;
            *guard = Some((segment_id, writer));
        }
        let (_, writer) = guard.as_mut().expect("segment writer just initialized");
        writer.add_document(AddOperation { opstamp, document }, &schema)?;
        Ok(opstamp)
    }

    /// Queues a delete-by-term, applied to every already-committed
    /// segment at the next `commit` (§4.2 "Deletion representation").
    /// Returns the opstamp the delete was stamped with.
    pub fn delete_term(&self, term: Term) -> Result<Opstamp> {
        let opstamp = self.stamper.stamp();
        self.delete_queue
            .lock()
            .expect("delete queue lock poisoned")
            .push(DeleteOperation { opstamp, term });
        Ok(opstamp)
    }

    /// Approximate memory currently held by the in-progress segment.
    pub fn mem_usage(&self) -> usize {
        self.current_segment
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|(_, writer)| writer.mem_usage()))
            .unwrap_or(0)
    }

    /// Flushes the in-progress segment (if any), applies every queued
    /// delete against the resulting committed segment set, and
    /// atomically publishes the new TOC. Returns the commit's opstamp.
    pub fn commit(&self) -> Result<Opstamp> {
        let commit_opstamp = self.stamper.peek();
        log::debug!("committing at opstamp {}", commit_opstamp);
        let new_segment_meta = self.flush_current_segment()?;
        let deletes = std::mem::take(&mut *self.delete_queue.lock().expect("delete queue lock poisoned"));

        let mut meta = self.index.load_metas()?;
        if let Some(new_meta) = new_segment_meta {
            meta.segments.push(new_meta);
        }
        let segments = self.apply_deletes(meta.segments, &deletes, commit_opstamp)?;
        self.segment_updater.save_segments(segments, commit_opstamp)?;
        log::info!("commit {} published", commit_opstamp);
        Ok(commit_opstamp)
    }

    /// Discards every operation queued since the last commit.
    pub fn rollback(&self) -> Result<()> {
        *self.current_segment.lock().expect("segment lock poisoned") = None;
        self.delete_queue.lock().expect("delete queue lock poisoned").clear();
        Ok(())
    }

    fn flush_current_segment(&self) -> Result<Option<SegmentMeta>> {
        let taken = self.current_segment.lock().expect("segment lock poisoned").take();
        let (segment_id, writer) = match taken {
            Some(pair) => pair,
            None => return Ok(None),
        };
        if writer.max_doc() == 0 {
            return Ok(None);
        }
        let doc_opstamps = writer.finalize()?;
        Ok(Some(SegmentMeta::new(segment_id, doc_opstamps.len() as u32)))
    }

    /// Rewrites each committed segment's `DELETE` component to also
    /// reflect `deletes`, by resolving every delete term to the
    /// postings it matches in that segment. A segment untouched by any
    /// delete (and that did not already carry deletes) is passed
    /// through unchanged.
    fn apply_deletes(
        &self,
        segments: Vec<SegmentMeta>,
        deletes: &[DeleteOperation],
        opstamp: Opstamp,
    ) -> Result<Vec<SegmentMeta>> {
        if deletes.is_empty() {
            return Ok(segments);
        }
        let mut updated = Vec::with_capacity(segments.len());
        for meta in segments {
            let segment = self.index.segment(meta.clone());
            let reader = SegmentReader::open(&segment)?;
            let mut bitset = crate::common::BitSet::with_max_value(reader.max_doc().max(1));
            for doc in 0..reader.max_doc() {
                if reader.is_deleted(doc) {
                    bitset.insert(doc);
                }
            }
            let mut newly_deleted = false;
            for delete in deletes {
                let field = delete.term.field();
                let inverted_index = reader.inverted_index(field);
                if let Some(mut postings) = inverted_index.read_postings(&delete.term)? {
                    while postings.advance() {
                        let doc = postings.doc();
                        if !bitset.contains(doc) {
                            bitset.insert(doc);
                            newly_deleted = true;
                        }
                    }
                }
            }
            if newly_deleted {
                let delete_path = segment.relative_path(SegmentComponent::DELETE);
                if self.index.directory().exists(&delete_path) {
                    self.index.directory().delete(&delete_path)?;
                }
                let bytes = write_delete_bitset(&bitset)?;
                let mut write = segment.open_write(SegmentComponent::DELETE)?;
                std::io::Write::write_all(&mut write, &bytes)?;
                write.terminate()?;
                updated.push(meta.with_delete_meta(bitset.len() as u32, opstamp));
            } else {
                updated.push(meta);
            }
        }
        Ok(updated)
    }
}
