use crate::core::SegmentId;

/// One proposed merge: fold every named segment into a single new one
/// (§5 "Merging"). Produced by a `MergePolicy`, resolved against the
/// current TOC and carried out by `SegmentUpdater`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeCandidate(pub Vec<SegmentId>);
