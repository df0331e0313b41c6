use std::path::PathBuf;

use crate::core::{Index, SegmentComponent, SegmentId, SegmentMeta};
use crate::directory::{ReadOnlySource, WritePtr};
use crate::schema::Schema;
use crate::Result;

/// One segment, bound to the `Index` (and therefore `Directory`) it
/// belongs to. Segments are immutable once written (§3 "Segment");
/// `Segment` is the handle a `SegmentWriter`/`SegmentMerger` writes
/// through and a `SegmentReader` reads through.
#[derive(Clone)]
pub struct Segment {
    index: Index,
    meta: SegmentMeta,
}

impl Segment {
    pub(crate) fn for_index(index: Index, meta: SegmentMeta) -> Segment {
        Segment { index, meta }
    }

    pub fn id(&self) -> SegmentId {
        self.meta.id()
    }

    pub fn meta(&self) -> &SegmentMeta {
        &self.meta
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn schema(&self) -> Schema {
        self.index.schema()
    }

    /// Returns a copy of `self` bound to an updated `SegmentMeta` (e.g.
    /// after `finalize` learns the actual `max_doc`).
    pub fn with_max_doc(self, max_doc: u32) -> Segment {
        Segment {
            index: self.index,
            meta: SegmentMeta::new(self.meta.id(), max_doc),
        }
    }

    pub fn relative_path(&self, component: SegmentComponent) -> PathBuf {
        self.meta.relative_path(component)
    }

    pub fn open_read(&self, component: SegmentComponent) -> Result<ReadOnlySource> {
        let path = self.relative_path(component);
        Ok(self.index.directory().open_read(&path)?)
    }

    pub fn open_write(&self, component: SegmentComponent) -> Result<WritePtr> {
        let path = self.relative_path(component);
        Ok(self.index.directory().open_write(&path)?)
    }
}

/// Implemented by anything that can lay itself out on disk through a
/// `SegmentSerializer` -- the `SegmentWriter` building a fresh segment
/// and the `IndexMerger` building a merged one both implement this, so
/// the commit/merge plumbing doesn't need to distinguish the two.
pub trait SerializableSegment {
    /// Writes self into an index, using the schema and doc opstamps
    /// carried by the serializer's segment, returning the number of
    /// documents actually written (`max_doc`).
    fn write(&self, serializer: crate::indexer::SegmentSerializer) -> Result<u32>;
}
