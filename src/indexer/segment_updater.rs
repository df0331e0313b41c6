use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::core::{Index, Segment, SegmentComponent, SegmentMeta, SerializableSegment};
use crate::indexer::merge_policy::{MergePolicy, NoMergePolicy};
use crate::indexer::merger::IndexMerger;
use crate::indexer::segment_serializer::SegmentSerializer;
use crate::Opstamp;
use crate::Result;

/// Owns the TOC transitions: registering a freshly flushed segment,
/// running whatever merges the configured `MergePolicy` proposes, and
/// deleting a merged-away segment's files once
/// `SegmentMeta::is_still_referenced` confirms no live reader still
/// needs them (§5 "Shared resources"). Grounded on the teacher's own
/// `SegmentUpdater`; simplified to run merges synchronously on the
/// calling thread rather than asynchronously on a background worker
/// pool (see `DESIGN.md`).
pub struct SegmentUpdater {
    index: Index,
    merge_policy: Mutex<Arc<dyn MergePolicy>>,
}

impl SegmentUpdater {
    pub fn new(index: Index) -> SegmentUpdater {
        SegmentUpdater {
            index,
            merge_policy: Mutex::new(Arc::new(NoMergePolicy)),
        }
    }

    pub fn set_merge_policy(&self, merge_policy: Arc<dyn MergePolicy>) {
        *self.merge_policy.lock().expect("merge policy lock poisoned") = merge_policy;
    }

    fn merge_policy(&self) -> Arc<dyn MergePolicy> {
        Arc::clone(&self.merge_policy.lock().expect("merge policy lock poisoned"))
    }

    /// Replaces the TOC's segment list wholesale and records `opstamp`
    /// as the commit point, then runs merges to convergence. Used both
    /// by a commit that adds fresh segments and by one that only
    /// rewrites delete bitsets.
    pub fn save_segments(&self, segments: Vec<SegmentMeta>, opstamp: Opstamp) -> Result<()> {
        log::debug!("publishing {} segments at opstamp {}", segments.len(), opstamp);
        let mut meta = self.index.load_metas()?;
        meta.segments = segments;
        meta.opstamp = opstamp;
        self.index.save_metas(&meta)?;
        self.run_merges()
    }

    fn run_merges(&self) -> Result<()> {
        let merge_policy = self.merge_policy();
        loop {
            let meta = self.index.load_metas()?;
            let candidates = merge_policy.compute_merge_candidates(&meta.segments);
            if candidates.is_empty() {
                return Ok(());
            }
            for candidate in candidates {
                let members: Vec<SegmentMeta> = meta
                    .segments
                    .iter()
                    .filter(|m| candidate.0.contains(&m.id()))
                    .cloned()
                    .collect();
                if members.len() < 2 {
                    continue;
                }
                self.merge(&members)?;
            }
        }
    }

    fn merge(&self, candidate: &[SegmentMeta]) -> Result<()> {
        log::info!("starting merge of {} segments", candidate.len());
        let segments: Vec<Segment> = candidate
            .iter()
            .map(|meta| self.index.segment(meta.clone()))
            .collect();
        let merger = IndexMerger::open(self.index.schema(), &segments)?;
        let mut merged_segment = self.index.new_segment();
        let serializer = SegmentSerializer::for_segment(&mut merged_segment)?;
        let max_doc = merger.write(serializer)?;
        let merged_meta = SegmentMeta::new(merged_segment.id(), max_doc);

        let merged_ids: HashSet<_> = candidate.iter().map(SegmentMeta::id).collect();
        let mut meta = self.index.load_metas()?;
        meta.segments.retain(|m| !merged_ids.contains(&m.id()));
        meta.segments.push(merged_meta);
        self.index.save_metas(&meta)?;

        for old_meta in candidate {
            if !old_meta.is_still_referenced() {
                self.delete_segment_files(old_meta);
            }
        }
        Ok(())
    }

    fn delete_segment_files(&self, meta: &SegmentMeta) {
        for &component in [
            SegmentComponent::TERMS,
            SegmentComponent::POSTINGS,
            SegmentComponent::POSITIONS,
            SegmentComponent::STORE,
            SegmentComponent::FASTFIELDS,
            SegmentComponent::FIELDNORMS,
            SegmentComponent::DELETE,
            SegmentComponent::TEMPSTORE,
        ]
        .iter()
        {
            let path = meta.relative_path(component);
            if self.index.directory().exists(&path) {
                let _ = self.index.directory().delete(&path);
            }
        }
    }
}
