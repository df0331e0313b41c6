//! Turns `Document`s into committed, on-disk segments (§5 "Write
//! path"): a `SegmentWriter` builds one segment in memory, an
//! `IndexMerger` folds several committed segments into one, and
//! `MergePolicy`/`SegmentUpdater` decide when that should happen.
//! Query-string parsing and ranked retrieval live in [`crate::query`]
//! and [`crate::collector`] instead -- this module only ever produces
//! segments, never reads them for scoring.

mod index_writer;
mod merge_operation;
mod merge_policy;
mod merger;
mod operation;
mod segment_serializer;
mod segment_updater;
mod segment_writer;
mod stamper;

pub use self::index_writer::IndexWriter;
pub use self::merge_operation::MergeCandidate;
pub use self::merge_policy::{MergePolicy, NoMergePolicy, TieredMergePolicy};
pub use self::merger::IndexMerger;
pub use self::operation::{AddOperation, DeleteOperation, IndexingOperation};
pub use self::segment_serializer::SegmentSerializer;
pub use self::segment_updater::SegmentUpdater;
pub use self::stamper::Stamper;
