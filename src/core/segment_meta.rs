use std::path::PathBuf;

use census::{Inventory, TrackedObject};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::{SegmentComponent, SegmentId};
use crate::Opstamp;

/// Bookkeeping for a segment's deletions: how many documents are
/// currently marked deleted and the opstamp of the delete operation that
/// last touched this segment's `DELETE` side file (§4.2 "Deletion
/// representation").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteMeta {
    num_deleted_docs: u32,
    opstamp: Opstamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct InnerSegmentMeta {
    segment_id: SegmentId,
    max_doc: u32,
    deletes: Option<DeleteMeta>,
}

/// Process-wide table of every `InnerSegmentMeta` currently referenced
/// by a live `SegmentMeta` handle. The merge scheduler consults
/// `SegmentMetaInventory::all` before deleting a merged-away segment's
/// files: if its id is still tracked (some reader opened before the
/// merge's commit is still alive), the delete is deferred (§5 "Shared
/// resources").
static INVENTORY: Lazy<Inventory<InnerSegmentMeta>> = Lazy::new(Inventory::default);

/// A cheaply-cloneable handle to one segment's metadata, as recorded in
/// the TOC. All clones of a `SegmentMeta` for the same segment share one
/// `TrackedObject`, which is how the inventory above can answer "is
/// anyone still referencing this segment id".
#[derive(Clone, Debug)]
pub struct SegmentMeta {
    tracked: TrackedObject<InnerSegmentMeta>,
}

impl SegmentMeta {
    /// Builds a brand new, zero-deletion `SegmentMeta` for a freshly
    /// flushed segment.
    pub fn new(segment_id: SegmentId, max_doc: u32) -> SegmentMeta {
        let inner = InnerSegmentMeta {
            segment_id,
            max_doc,
            deletes: None,
        };
        SegmentMeta {
            tracked: INVENTORY.track(inner),
        }
    }

    pub fn id(&self) -> SegmentId {
        self.tracked.segment_id
    }

    /// Doc count including deleted documents: every assigned docid in
    /// `0..max_doc` is a valid local docid, whether or not it is live.
    pub fn max_doc(&self) -> u32 {
        self.tracked.max_doc
    }

    /// Live (undeleted) document count.
    pub fn num_docs(&self) -> u32 {
        self.max_doc() - self.num_deleted_docs()
    }

    pub fn num_deleted_docs(&self) -> u32 {
        self.tracked
            .deletes
            .as_ref()
            .map(|d| d.num_deleted_docs)
            .unwrap_or(0)
    }

    pub fn has_deletes(&self) -> bool {
        self.num_deleted_docs() > 0
    }

    pub fn delete_opstamp(&self) -> Option<Opstamp> {
        self.tracked.deletes.as_ref().map(|d| d.opstamp)
    }

    /// Returns a new `SegmentMeta` (a fresh tracked entry, same segment
    /// id) carrying updated deletion bookkeeping, for use after a
    /// `delete_by_term`/`delete_by_query` pass rewrites the `DELETE`
    /// side file.
    pub fn with_delete_meta(&self, num_deleted_docs: u32, opstamp: Opstamp) -> SegmentMeta {
        let inner = InnerSegmentMeta {
            segment_id: self.id(),
            max_doc: self.max_doc(),
            deletes: Some(DeleteMeta {
                num_deleted_docs,
                opstamp,
            }),
        };
        SegmentMeta {
            tracked: INVENTORY.track(inner),
        }
    }

    /// The relative path of one of this segment's files.
    pub fn relative_path(&self, component: SegmentComponent) -> PathBuf {
        let mut path = self.id().uuid_string();
        path.push('.');
        path.push_str(component.extension());
        PathBuf::from(path)
    }

    /// Whether any live handle elsewhere in the process still references
    /// this exact segment id (possibly via a different `SegmentMeta`
    /// value, e.g. after a delete pass bumped its `DeleteMeta`).
    pub fn is_still_referenced(&self) -> bool {
        INVENTORY
            .list()
            .iter()
            .any(|tracked| tracked.segment_id == self.id())
    }
}

impl Serialize for SegmentMeta {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (*self.tracked).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SegmentMeta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let inner = InnerSegmentMeta::deserialize(deserializer)?;
        Ok(SegmentMeta {
            tracked: INVENTORY.track(inner),
        })
    }
}
